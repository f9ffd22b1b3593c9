mod lifecycle_service_impl;
mod notification_policy;

pub use lifecycle_service_impl::LifecycleServiceImpl;
pub use notification_policy::NotificationPolicy;
