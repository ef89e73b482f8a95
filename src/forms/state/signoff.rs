// src/forms/state/signoff.rs
//! Ordered list of approval slots, each pairing a role name with an opaque
//! signature payload supplied by the capture widget.

use serde::{Deserialize, Serialize};

use crate::forms::error::{FormError, FormResult};

/// Opaque to the engine; typically `{ "name", "date", "image" }`.
pub type SignaturePayload = serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignoffRole {
    pub role_name: String,
    #[serde(default = "empty_payload")]
    pub data: SignaturePayload,
}

pub fn empty_payload() -> SignaturePayload {
    serde_json::Value::Object(serde_json::Map::new())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignoffBlock {
    pub roles: Vec<SignoffRole>,
}

impl SignoffBlock {
    pub fn with_roles<S: AsRef<str>>(names: &[S]) -> Self {
        let mut block = SignoffBlock::default();
        for name in names {
            block.add_role(name.as_ref());
        }
        block
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn add_role(&mut self, default_name: &str) {
        self.roles.push(SignoffRole {
            role_name: default_name.to_string(),
            data: empty_payload(),
        });
    }

    pub fn rename_role(&mut self, index: usize, new_name: &str) -> FormResult<()> {
        let role = self.role_mut(index)?;
        role.role_name = new_name.to_string();
        Ok(())
    }

    /// No minimum count is enforced here.
    pub fn remove_role(&mut self, index: usize) -> FormResult<SignoffRole> {
        self.check_index(index)?;
        Ok(self.roles.remove(index))
    }

    pub fn set_data(&mut self, index: usize, payload: SignaturePayload) -> FormResult<()> {
        let role = self.role_mut(index)?;
        role.data = payload;
        Ok(())
    }

    pub fn role(&self, index: usize) -> Option<&SignoffRole> {
        self.roles.get(index)
    }

    fn role_mut(&mut self, index: usize) -> FormResult<&mut SignoffRole> {
        self.check_index(index)?;
        Ok(&mut self.roles[index])
    }

    fn check_index(&self, index: usize) -> FormResult<()> {
        if index < self.roles.len() {
            Ok(())
        } else {
            Err(FormError::IndexOutOfBounds {
                target: "signoffs".to_string(),
                index,
                len: self.roles.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rename_keeps_payload() {
        let mut block = SignoffBlock::with_roles(&["Prepared By", "Approved By"]);
        block
            .set_data(1, json!({"name": "J. Doe", "date": "2024-05-01"}))
            .unwrap();
        block.rename_role(1, "Final Approval").unwrap();
        let role = block.role(1).unwrap();
        assert_eq!(role.role_name, "Final Approval");
        assert_eq!(role.data["name"], "J. Doe");
    }

    #[test]
    fn remove_allows_empty_block() {
        let mut block = SignoffBlock::with_roles(&["Prepared By"]);
        let removed = block.remove_role(0).unwrap();
        assert_eq!(removed.role_name, "Prepared By");
        assert!(block.is_empty());
        assert!(block.remove_role(0).is_err());
    }

    #[test]
    fn new_roles_start_with_empty_payload() {
        let mut block = SignoffBlock::default();
        block.add_role("Reviewed By");
        assert_eq!(block.role(0).unwrap().data, json!({}));
        assert!(block.set_data(3, json!({})).is_err());
    }
}
