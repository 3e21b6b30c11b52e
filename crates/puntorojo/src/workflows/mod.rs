pub mod intake;
pub mod losses;
