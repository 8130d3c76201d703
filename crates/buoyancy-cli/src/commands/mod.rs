// One module per subcommand; main.rs parses arguments and dispatches here.

pub mod convert;
pub mod init;
pub mod materials;
pub mod optimize;
pub mod pack;
pub mod parse;
