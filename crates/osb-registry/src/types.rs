//! Plan metadata to artifact type resolution.

use crate::error::{RegistryError, Result};
use osb_core::{ServicePlan, Types, BINDING_TYPE_KEY, INSTANCE_TYPE_KEY};

/// Extract the instance and binding artifact locators from a plan.
///
/// The instance type is mandatory. A missing binding type means the plan is
/// not bindable. A key holding anything but a string counts as missing, and a
/// non-string binding type fails the plan like a missing instance type.
pub fn resolve_types(plan: &ServicePlan) -> Result<Types> {
    let unusable = || RegistryError::NoUsableTypes {
        plan_id: plan.id.clone(),
    };

    let metadata = plan.metadata_view().ok_or_else(unusable)?;
    let instance = metadata.string(INSTANCE_TYPE_KEY).ok_or_else(unusable)?;

    if !metadata.contains(BINDING_TYPE_KEY) {
        return Ok(Types {
            instance: instance.to_string(),
            binding: None,
        });
    }

    let binding = metadata.string(BINDING_TYPE_KEY).ok_or_else(unusable)?;

    Ok(Types {
        instance: instance.to_string(),
        binding: Some(binding.to_string()).filter(|b| !b.is_empty()),
    })
}
