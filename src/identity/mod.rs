// Identity module - participant keypairs and the addresses derived from them

mod address;
mod keypair;

pub use address::{Address, AddressError, ADDRESS_LEN};
pub use keypair::{Keypair, KeypairError, PublicKey};
