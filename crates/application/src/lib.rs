//! Application services and ports.

#![forbid(unsafe_code)]

mod statistics_service;
mod template_ports;
mod template_service;
mod workflow_service;

pub use statistics_service::{DepositStatisticsService, MonthlyCount};
pub use template_ports::{
    Clock, ContainerStore, DepositStatisticsRepository, Messenger, TemplateRepository,
    WorkflowRepository,
};
pub use template_service::PermissionTemplateService;
pub use workflow_service::WorkflowActivationService;
