//! Shared world state for task lifecycle BDD scenarios.

use std::sync::Arc;

use rstest::fixture;
use workforce::authorization::{AuthorizationGate, Grant, RoleGate};
use workforce::identity::{
    adapters::memory::InMemoryIdentityDirectory,
    domain::{CompanyId, Role, UserId},
};
use workforce::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskRecord},
    services::{TaskLifecycleError, TaskLifecycleService},
};
use mockable::DefaultClock;

/// Service type used by the BDD world.
pub type TestTaskService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryIdentityDirectory, DefaultClock>;

const COMPANY: CompanyId = CompanyId::new(1);
const STAFF: [(&str, i64, Role); 4] = [
    ("supervisor", 1, Role::Supervisor),
    ("alice", 2, Role::User),
    ("bob", 3, Role::User),
    ("hannah", 4, Role::Head),
];

/// Scenario world for task lifecycle behaviour tests.
pub struct LifecycleWorld {
    pub service: TestTaskService,
    pub grant: Option<Grant>,
    pub task: Option<Task>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl LifecycleWorld {
    /// Creates a world whose directory holds the scenario staff.
    #[must_use]
    pub fn new() -> Self {
        let directory = InMemoryIdentityDirectory::new();
        let mut grant = None;
        for (_, id, role) in STAFF {
            let Ok(identity) = directory.add_user(UserId::new(id), role, COMPANY) else {
                continue;
            };
            if let Ok(issued) = RoleGate::new().authorize(&identity, &Role::PRIVILEGED) {
                grant = Some(issued);
            }
        }

        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(directory),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            grant,
            task: None,
            last_result: None,
        }
    }

    /// Returns the supervisor's grant.
    pub fn grant(&self) -> Result<Grant, eyre::Report> {
        self.grant
            .ok_or_else(|| eyre::eyre!("missing supervisor grant in scenario world"))
    }

    /// Returns the task created by the scenario.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing created task in scenario world"))
    }

    /// Reloads the scenario task with its operation.
    pub fn reload(&self) -> Result<TaskRecord, eyre::Report> {
        let id = self.task()?.id();
        run_async(self.service.find(id))?
            .ok_or_else(|| eyre::eyre!("task {id} disappeared from the repository"))
    }

    /// Records the outcome of a lifecycle call.
    pub fn record(&mut self, result: Result<Task, TaskLifecycleError>) {
        if let Ok(ref updated) = result {
            self.task = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves a scenario name such as `"alice"` to a user identifier.
pub fn user_named(name: &str) -> Result<UserId, eyre::Report> {
    STAFF
        .iter()
        .find(|(staff_name, _, _)| *staff_name == name)
        .map(|(_, id, _)| UserId::new(*id))
        .ok_or_else(|| eyre::eyre!("unknown scenario user {name}"))
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
