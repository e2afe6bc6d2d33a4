use serde::Serialize;
use timeverify_core::error::TimeVerifyError;

pub fn print<T: Serialize>(value: &T) -> Result<(), TimeVerifyError> {
    let json = timeverify_core::export::to_json_string(value)?;
    println!("{json}");
    Ok(())
}
