quick_error! {
    #[derive(Debug, PartialEq)]
    pub enum ServerError {
        RxClosed {
            display("stop signal receiver is gone")
        }

        NotStarted {
            display("server was never started")
        }
    }
}
