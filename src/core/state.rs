use crate::process::CommandStatus;

/// State shared between the read loop and built-in handlers.
#[derive(Debug, Default)]
pub struct ShellState {
    should_exit: bool,
    exit_code: i32,
    last_status: Option<CommandStatus>,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_exit(&mut self) {
        self.should_exit = true;
    }

    pub fn request_exit_with(&mut self, code: i32) {
        self.exit_code = code;
        self.request_exit();
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn record(&mut self, status: CommandStatus) {
        self.last_status = Some(status);
    }

    pub fn last_status(&self) -> Option<CommandStatus> {
        self.last_status
    }
}
