//! Read-only directories of employees, contracts and clients.
//!
//! The engine consumes these as injected capabilities. [`KeyValueDirectory`]
//! implements all three over the key-value store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{EngineError, EngineResult};
use crate::models::{Client, ClientId, Contract, ContractId, Employee, EmployeeId};

use super::collection::{CLIENTS_KEY, CONTRACTS_KEY, EMPLOYEES_KEY, JsonCollection};
use super::KeyValueStore;

/// Looks up employees.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Returns the employee or [`EngineError::NotFound`].
    async fn get_by_id(&self, id: &EmployeeId) -> EngineResult<Employee>;
}

/// Looks up contracts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractDirectory: Send + Sync {
    /// Returns the contract or [`EngineError::NotFound`].
    async fn get_by_id(&self, id: &ContractId) -> EngineResult<Contract>;

    /// Returns every contract placed with the client.
    async fn list_by_client(&self, client_id: &ClientId) -> EngineResult<Vec<Contract>>;
}

/// Looks up clients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Returns the client or [`EngineError::NotFound`].
    async fn get_by_id(&self, id: &ClientId) -> EngineResult<Client>;
}

/// Directories backed by the `employees`, `contracts` and `clients` collections.
#[derive(Clone)]
pub struct KeyValueDirectory {
    employees: JsonCollection<Employee>,
    contracts: JsonCollection<Contract>,
    clients: JsonCollection<Client>,
}

impl KeyValueDirectory {
    /// Binds the directories to `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            employees: JsonCollection::new(Arc::clone(&store), EMPLOYEES_KEY),
            contracts: JsonCollection::new(Arc::clone(&store), CONTRACTS_KEY),
            clients: JsonCollection::new(store, CLIENTS_KEY),
        }
    }

    /// Inserts or replaces an employee.
    pub async fn put_employee(&self, employee: Employee) -> EngineResult<()> {
        let mut all = self.employees.load().await?;
        all.retain(|e| e.id != employee.id);
        all.push(employee);
        self.employees.save(&all).await
    }

    /// Inserts or replaces a contract.
    pub async fn put_contract(&self, contract: Contract) -> EngineResult<()> {
        let mut all = self.contracts.load().await?;
        all.retain(|c| c.id != contract.id);
        all.push(contract);
        self.contracts.save(&all).await
    }

    /// Inserts or replaces a client.
    pub async fn put_client(&self, client: Client) -> EngineResult<()> {
        let mut all = self.clients.load().await?;
        all.retain(|c| c.id != client.id);
        all.push(client);
        self.clients.save(&all).await
    }
}

#[async_trait]
impl EmployeeDirectory for KeyValueDirectory {
    async fn get_by_id(&self, id: &EmployeeId) -> EngineResult<Employee> {
        self.employees
            .load()
            .await?
            .into_iter()
            .find(|e| &e.id == id)
            .ok_or_else(|| EngineError::not_found("employee", id.as_str()))
    }
}

#[async_trait]
impl ContractDirectory for KeyValueDirectory {
    async fn get_by_id(&self, id: &ContractId) -> EngineResult<Contract> {
        self.contracts
            .load()
            .await?
            .into_iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| EngineError::not_found("contract", id.as_str()))
    }

    async fn list_by_client(&self, client_id: &ClientId) -> EngineResult<Vec<Contract>> {
        Ok(self
            .contracts
            .load()
            .await?
            .into_iter()
            .filter(|c| &c.client_id == client_id)
            .collect())
    }
}

#[async_trait]
impl ClientDirectory for KeyValueDirectory {
    async fn get_by_id(&self, id: &ClientId) -> EngineResult<Client> {
        self.clients
            .load()
            .await?
            .into_iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| EngineError::not_found("client", id.as_str()))
    }
}
