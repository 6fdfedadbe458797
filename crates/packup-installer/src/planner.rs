use packup_cluster::{PackageCatalog, TemplateApplier};
use packup_core::{
    known_package, PackageOutcome, PackageRecord, PlanEntry, SkipReason, UpgradeError,
    UpgradeOutcome, UpgradeRequest, UpgradeScope,
};
use packup_resolver::{resolve_version, HttpFetcher};

use crate::fetch_and_apply;

/// The collaborators one upgrade run talks to.
#[derive(Clone, Copy)]
pub struct UpgradeEnv<'a> {
    pub catalog: &'a dyn PackageCatalog,
    pub fetcher: &'a dyn HttpFetcher,
    pub applier: &'a dyn TemplateApplier,
    /// Root of the artifact repository the known-package fallback points at.
    pub repository_base: &'a str,
}

/// Checks every package in scope and upgrades the ones whose installed version differs
/// from the resolved one, reporting each outcome as soon as it is known.
///
/// Only a failure to read the catalog is returned as an error; every per-package failure
/// is reported and the remaining packages are still processed.
pub fn plan_upgrades<F>(
    env: &UpgradeEnv<'_>,
    request: &UpgradeRequest,
    mut report: F,
) -> Result<(), UpgradeError>
where
    F: FnMut(PlanEntry),
{
    let records = env
        .catalog
        .list_packages(&request.namespace)
        .map_err(|err| UpgradeError::CatalogUnreachable {
            namespace: request.namespace.clone(),
            reason: format!("{err:#}"),
        })?;

    let mut found = false;
    for record in records {
        if !request.scope.includes(&record.name) {
            continue;
        }
        if let Some(reason) = record.missing_metadata() {
            tracing::warn!(package = %record.name, %reason, "invalid package");
            report(PlanEntry::Package(PackageOutcome::new(
                record.name,
                UpgradeOutcome::Skipped(reason),
            )));
            continue;
        }

        found = true;
        report(PlanEntry::Package(upgrade_candidate(env, &record, request)));
    }

    if found {
        return Ok(());
    }

    match &request.scope {
        UpgradeScope::All => report(PlanEntry::NoPackagesFound),
        UpgradeScope::Named(names) => {
            for name in names {
                report(PlanEntry::Package(fallback_candidate(env, name, request)));
            }
        }
    }
    Ok(())
}

pub fn collect_plan(
    env: &UpgradeEnv<'_>,
    request: &UpgradeRequest,
) -> Result<Vec<PlanEntry>, UpgradeError> {
    let mut entries = Vec::new();
    plan_upgrades(env, request, |entry| entries.push(entry))?;
    Ok(entries)
}

fn upgrade_candidate(
    env: &UpgradeEnv<'_>,
    record: &PackageRecord,
    request: &UpgradeRequest,
) -> PackageOutcome {
    let resolved = resolve_version(
        env.fetcher,
        &request.requested_version,
        &record.metadata_url,
    );

    let outcome = match resolved {
        Err(err) => {
            tracing::warn!(package = %record.name, "{err}");
            UpgradeOutcome::Failed(err)
        }
        Ok(version) if record.is_installed_at(&version) => {
            tracing::info!(package = %record.name, %version, "package is already current");
            UpgradeOutcome::AlreadyCurrent { version }
        }
        Ok(version) => fetch_and_apply(env, record, &version, request),
    };
    PackageOutcome::new(record.name.clone(), outcome)
}

fn fallback_candidate(
    env: &UpgradeEnv<'_>,
    name: &str,
    request: &UpgradeRequest,
) -> PackageOutcome {
    let Some(known) = known_package(name) else {
        tracing::warn!(package = name, "unknown package name");
        return PackageOutcome::new(name, UpgradeOutcome::Skipped(SkipReason::UnknownPackage));
    };

    tracing::debug!(package = name, "no package ConfigMap found, using known package URLs");
    let record = known.to_record(name, env.repository_base);
    upgrade_candidate(env, &record, request)
}
