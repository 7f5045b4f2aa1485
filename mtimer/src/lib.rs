pub mod bus;
pub mod csr;
pub mod hart;
pub mod machine;
pub mod timer;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Trap {
    LoadAccessFault(u64),
    StoreAccessFault(u64),

    MachineTimerInterrupt,

    // Custom internal errors
    Fatal(String),
}

impl std::fmt::Display for Trap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for Trap {}
