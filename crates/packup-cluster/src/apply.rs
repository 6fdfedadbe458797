use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::template::{process_template, render_object_list, ProcessOptions};
use crate::Kubectl;

/// Everything the cluster needs to create or update one package's resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateApplyRequest<'a> {
    pub payload: &'a [u8],
    pub package_name: &'a str,
    pub namespace: &'a str,
    pub domain: &'a str,
    pub api_server: &'a str,
    pub persist_volumes: bool,
    pub initial_install: bool,
}

impl TemplateApplyRequest<'_> {
    pub fn parameters(&self) -> BTreeMap<String, String> {
        let mut parameters = BTreeMap::new();
        for (name, value) in [
            ("DOMAIN", self.domain),
            ("APISERVER", self.api_server),
            ("NAMESPACE", self.namespace),
        ] {
            if !value.is_empty() {
                parameters.insert(name.to_string(), value.to_string());
            }
        }
        parameters
    }
}

pub trait TemplateApplier {
    fn apply(&self, request: &TemplateApplyRequest<'_>) -> Result<()>;
}

impl TemplateApplier for Kubectl {
    fn apply(&self, request: &TemplateApplyRequest<'_>) -> Result<()> {
        let objects = process_template(
            request.payload,
            &request.parameters(),
            ProcessOptions {
                persist_volumes: request.persist_volumes,
                initial_install: request.initial_install,
            },
        )
        .with_context(|| format!("failed to process template for package {}", request.package_name))?;

        if objects.is_empty() {
            tracing::warn!(package = request.package_name, "template has no objects to apply");
            return Ok(());
        }

        let rendered = render_object_list(&objects)?;
        let output = self.run_with_stdin(
            &["apply", "--namespace", request.namespace, "--filename", "-"],
            rendered.as_bytes(),
        )?;
        tracing::info!(
            package = request.package_name,
            objects = objects.len(),
            "applied template"
        );
        for line in String::from_utf8_lossy(&output).lines() {
            tracing::debug!(package = request.package_name, "{line}");
        }
        Ok(())
    }
}
