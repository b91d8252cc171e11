use prost::{DecodeError, EncodeError};

quick_error! {
    /// Errors occur when encoding or decoding a serialized unresolved
    /// entry. Any of them means the message must be rejected.
    #[derive(Debug, PartialEq, Eq)]
    pub enum EntryError {
        ProstError(err: String) {
            from(err: DecodeError) -> (format!("{:?}", err))
            from(err: EncodeError) -> (format!("{:?}", err))
            display("prost error: {:?}", err)
        }

        LackOf(field: String) {
            display("lack of required field:{}", field)
        }

        UnknownDataTag(tag: i32) {
            display("unknown data name tag:{}", tag)
        }

        ActionOutOfSet(action: i32) {
            display("action not in persona action set:{}", action)
        }

        TooManyVotes(got: usize, cap: usize) {
            display("{} votes exceeds persona wire cap:{}", got, cap)
        }

        FlagMismatch(persona: &'static str, problem: &'static str) {
            display("no_persist flag {} for persona:{}", problem, persona)
        }
    }
}
