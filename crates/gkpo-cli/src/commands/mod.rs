pub mod canonicalize;
pub mod check;
pub mod compare;
pub mod decode;
pub mod encode;
pub mod verify;
