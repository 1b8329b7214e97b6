// utils/pda.rs
use anchor_lang::prelude::*;

/// Serialize `value` (with discriminator) into an account we own
pub fn write_account<T: AccountSerialize>(target: &AccountInfo, value: &T) -> Result<()> {
    let mut data = target.try_borrow_mut_data()?;
    value.try_serialize(&mut *data)
}

/// Deserialize one of our accounts passed unchecked; `None` when it does
/// not exist or is not a valid `T` owned by this program
pub fn read_account<T: AccountDeserialize>(info: &AccountInfo) -> Option<T> {
    if info.data_is_empty() || info.owner != &crate::ID {
        return None;
    }
    let data = info.try_borrow_data().ok()?;
    T::try_deserialize(&mut &data[..]).ok()
}
