//! Route modules for the command/query surface, one per domain.

pub mod disruptions;
pub mod notifications;
pub mod requests;
pub mod shipments;

use serde::Deserialize;
use utoipa::IntoParams;

use fm_core::PartyRef;
use fm_coord::{CoordError, RoleFilter};

use crate::error::AppError;

/// Role-scoped projection query: `?role=supplier&party=S-001`.
///
/// Both parameters together, or neither (operator view).
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoleQuery {
    /// One of "supplier", "transporter", "customer".
    pub role: Option<String>,
    /// The party the role refers to.
    pub party: Option<String>,
}

impl RoleQuery {
    /// Resolve the query into a store projection filter.
    pub fn filter(&self) -> Result<RoleFilter, AppError> {
        match (self.role.as_deref(), self.party.as_deref()) {
            (None, None) => Ok(RoleFilter::All),
            (Some(role), Some(party)) => {
                let party = PartyRef::new(party).map_err(CoordError::from)?;
                match role {
                    "supplier" => Ok(RoleFilter::Supplier(party)),
                    "transporter" => Ok(RoleFilter::Transporter(party)),
                    "customer" => Ok(RoleFilter::Customer(party)),
                    other => Err(AppError::Query(format!(
                        "unknown role '{other}', expected supplier, transporter, or customer"
                    ))),
                }
            }
            _ => Err(AppError::Query(
                "role and party must be provided together".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_parameters_means_operator_view() {
        let q = RoleQuery {
            role: None,
            party: None,
        };
        assert_eq!(q.filter().expect("filter"), RoleFilter::All);
    }

    #[test]
    fn role_without_party_is_rejected() {
        let q = RoleQuery {
            role: Some("supplier".to_string()),
            party: None,
        };
        assert!(q.filter().is_err());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let q = RoleQuery {
            role: Some("auditor".to_string()),
            party: Some("A-1".to_string()),
        };
        assert!(q.filter().is_err());
    }
}
