use super::domain::{ClassificationCode, VehicleType};
use super::repository::{ReferenceStore, ReferenceStoreError};

/// Return the first classified code with a prohibition configured for the
/// vehicle type, if any. Evaluation short-circuits on the first hit; the
/// caller must not perform any fee lookup once a code is returned.
pub(crate) fn first_prohibited<R>(
    store: &R,
    vehicle_type: &VehicleType,
    codes: &[ClassificationCode],
) -> Result<Option<ClassificationCode>, ReferenceStoreError>
where
    R: ReferenceStore + ?Sized,
{
    for code in codes {
        if store.prohibited(vehicle_type, code)? {
            return Ok(Some(code.clone()));
        }
    }
    Ok(None)
}
