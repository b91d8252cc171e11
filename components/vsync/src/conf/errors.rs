quick_error! {
    #[derive(Debug)]
    pub enum ConfError {
        IOError(e: std::io::Error) {
            from(e: std::io::Error) -> (e)
        }

        BadYaml(e: serde_yaml::Error) {
            from(e: serde_yaml::Error) -> (e)
        }

        EmptyGroup {}

        BadQuorum(quorum: usize, group_size: usize) {}

        BadSyncCounterMax {}
    }
}

impl PartialEq<ConfError> for ConfError {
    fn eq(&self, other: &ConfError) -> bool {
        match (self, other) {
            (Self::IOError(a), Self::IOError(b)) => a.kind() == b.kind(),
            (Self::BadYaml(_), Self::BadYaml(_)) => true,
            (Self::EmptyGroup, Self::EmptyGroup) => true,
            (Self::BadQuorum(a, b), Self::BadQuorum(x, y)) => a == x && b == y,
            (Self::BadSyncCounterMax, Self::BadSyncCounterMax) => true,
            _ => false,
        }
    }
}
