/*
[INPUT]:  Interactive terminal sessions
[OUTPUT]: Guided setup commands
[POS]:    CLI layer - interactive helpers
[UPDATE]: When adding interactive commands
*/

pub mod init;

pub use init::run_init;
