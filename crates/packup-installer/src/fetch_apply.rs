use packup_cluster::TemplateApplyRequest;
use packup_core::{build_template_url, PackageRecord, UpgradeError, UpgradeOutcome, UpgradeRequest};

use crate::UpgradeEnv;

/// Downloads the template of `record` at `version` for the request's platform and hands
/// it to the applier.
pub fn fetch_and_apply(
    env: &UpgradeEnv<'_>,
    record: &PackageRecord,
    version: &str,
    request: &UpgradeRequest,
) -> UpgradeOutcome {
    tracing::info!(package = %record.name, version, "upgrading package");

    let url = build_template_url(&record.template_url_pattern, version, request.platform);
    tracing::info!(package = %record.name, %url, "downloading package template");

    let payload = match env.fetcher.get(&url) {
        Ok(payload) => payload,
        Err(err) => {
            let err = UpgradeError::DownloadError {
                url,
                reason: format!("{err:#}"),
            };
            tracing::warn!(package = %record.name, "{err}");
            return UpgradeOutcome::Failed(err);
        }
    };

    let apply_request = TemplateApplyRequest {
        payload: &payload,
        package_name: &record.name,
        namespace: &request.namespace,
        domain: &request.domain,
        api_server: &request.api_server,
        persist_volumes: request.persist_volumes,
        initial_install: false,
    };
    if let Err(err) = env.applier.apply(&apply_request) {
        let err = UpgradeError::ApplyError {
            package: record.name.clone(),
            reason: format!("{err:#}"),
        };
        tracing::warn!(package = %record.name, "{err}");
        return UpgradeOutcome::Failed(err);
    }

    UpgradeOutcome::Upgraded {
        from: record.installed_version.clone(),
        to: version.to_string(),
    }
}
