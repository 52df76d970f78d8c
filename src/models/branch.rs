//! Outlet branch definitions.

use serde::{Deserialize, Serialize};

/// One physical outlet location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    /// Native display name (e.g., "송도")
    pub name: String,

    /// URL-safe code used as the filename prefix and path segment
    pub code: String,

    /// Branch code understood by the source site
    pub branch_cd: String,

    /// Spreadsheet sheet receiving this branch's rows
    pub sheet: String,
}

impl Branch {
    /// Filename prefix for pages of this branch.
    pub fn file_prefix(&self) -> String {
        format!("{}-", self.code)
    }
}

/// Find the branch owning a `{code}-…` filename.
pub fn branch_for_filename<'a>(branches: &'a [Branch], filename: &str) -> Option<&'a Branch> {
    branches
        .iter()
        .find(|b| filename.starts_with(&b.file_prefix()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branches() -> Vec<Branch> {
        vec![
            Branch {
                name: "송도".to_string(),
                code: "songdo".to_string(),
                branch_cd: "B00174000".to_string(),
                sheet: "Sheet1".to_string(),
            },
            Branch {
                name: "스페이스원".to_string(),
                code: "spaceone".to_string(),
                branch_cd: "B00178000".to_string(),
                sheet: "Sheet3".to_string(),
            },
        ]
    }

    #[test]
    fn test_branch_for_filename() {
        let branches = branches();
        assert_eq!(
            branch_for_filename(&branches, "spaceone-sale.html").map(|b| b.code.as_str()),
            Some("spaceone")
        );
        assert!(branch_for_filename(&branches, "event-abc.html").is_none());
        assert!(branch_for_filename(&branches, "songdosale.html").is_none());
    }
}
