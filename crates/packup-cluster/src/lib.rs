mod apply;
mod catalog;
mod context;
mod kubectl;
mod template;

pub use apply::{TemplateApplier, TemplateApplyRequest};
pub use catalog::{
    parse_config_map_list, record_from_config_map, ConfigMap, ObjectMeta, PackageCatalog,
    PackageRecords,
};
pub use context::{platform_from_api_versions, ClusterContext};
pub use kubectl::Kubectl;
pub use template::{process_template, render_object_list, ProcessOptions};
