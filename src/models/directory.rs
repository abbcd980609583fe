//! Directory records: employees, contracts and clients.
//!
//! These are owned by the back-office CRUD layer; the engine only reads them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ClientId, ContractId, EmployeeId};

/// A placed worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier.
    pub id: EmployeeId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Job title or qualification.
    #[serde(default)]
    pub position: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
}

impl Employee {
    /// Returns "First Last", trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// An employee's placement with a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Unique identifier.
    pub id: ContractId,
    /// The employee placed.
    pub employee_id: EmployeeId,
    /// The client receiving the placement.
    pub client_id: ClientId,
    /// Mission title.
    pub title: String,
    /// Work location.
    #[serde(default)]
    pub location: String,
    /// First day of the placement.
    pub start_date: NaiveDate,
    /// Last day of the placement, open-ended when absent.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Rate charged to the client per hour.
    #[serde(default)]
    pub billing_rate: Option<Decimal>,
    /// Rate paid to the employee per hour.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Contracted weekly hours.
    #[serde(default)]
    pub working_hours: Option<Decimal>,
}

impl Contract {
    /// Returns true when the placement covers `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.is_none_or(|end| date <= end)
    }
}

/// A billed customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier.
    pub id: ClientId,
    /// Company name.
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Postal code.
    #[serde(default)]
    pub postal_code: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// Company registration number (SIRET).
    #[serde(default)]
    pub siret: Option<String>,
    /// Billing contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Negotiated payment terms, in days.
    #[serde(default)]
    pub payment_terms_days: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_contract(end_date: Option<NaiveDate>) -> Contract {
        Contract {
            id: "ctr_001".into(),
            employee_id: "emp_001".into(),
            client_id: "cli_001".into(),
            title: "Welder".to_string(),
            location: "Lyon".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            end_date,
            billing_rate: Some(Decimal::new(20, 0)),
            hourly_rate: Some(Decimal::new(14, 0)),
            working_hours: None,
        }
    }

    #[test]
    fn test_open_ended_contract_is_active_after_start() {
        let contract = create_contract(None);
        assert!(contract.is_active_on(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
        assert!(!contract.is_active_on(NaiveDate::from_ymd_opt(2026, 1, 4).unwrap()));
    }

    #[test]
    fn test_bounded_contract_end_is_inclusive() {
        let contract = create_contract(NaiveDate::from_ymd_opt(2026, 1, 31));
        assert!(contract.is_active_on(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
        assert!(!contract.is_active_on(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
    }

    #[test]
    fn test_full_name() {
        let employee = Employee {
            id: "emp_001".into(),
            first_name: "Camille".to_string(),
            last_name: "Durand".to_string(),
            position: String::new(),
            email: None,
        };
        assert_eq!(employee.full_name(), "Camille Durand");
    }

    #[test]
    fn test_client_optional_fields_default() {
        let json = r#"{"id": "cli_001", "name": "Acme"}"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.name, "Acme");
        assert!(client.payment_terms_days.is_none());
        assert!(client.address.is_empty());
    }
}
