use crate::{url_join, PackageRecord};

pub const DEFAULT_REPOSITORY_BASE: &str = "https://repo1.maven.org/maven2/";

/// A well-known package that can be upgraded even when no package ConfigMap exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownPackage {
    pub aliases: &'static [&'static str],
    pub metadata_path: &'static str,
    pub template_path: &'static str,
}

pub const KNOWN_PACKAGES: &[KnownPackage] = &[
    KnownPackage {
        aliases: &["platform", "fabric8-platform", "fabric8-platform-package"],
        metadata_path: "io/fabric8/platform/packages/fabric8-platform/maven-metadata.xml",
        template_path: "io/fabric8/platform/packages/fabric8-platform/%[1]s/fabric8-platform-%[1]s-",
    },
    KnownPackage {
        aliases: &["console", "fabric8-console", "fabric8-console-package"],
        metadata_path: "io/fabric8/platform/packages/console/maven-metadata.xml",
        template_path: "io/fabric8/platform/packages/console/%[1]s/console-%[1]s-",
    },
    KnownPackage {
        aliases: &["ipaas", "ipaas-platform", "ipaas-platform-package"],
        metadata_path: "io/fabric8/ipaas/platform/packages/ipaas-platform/maven-metadata.xml",
        template_path: "io/fabric8/ipaas/platform/packages/ipaas-platform/%[1]s/ipaas-platform-%[1]s-",
    },
];

pub fn known_package(name: &str) -> Option<&'static KnownPackage> {
    KNOWN_PACKAGES
        .iter()
        .find(|package| package.aliases.contains(&name))
}

impl KnownPackage {
    pub fn metadata_url(&self, repository_base: &str) -> String {
        url_join(repository_base, self.metadata_path)
    }

    pub fn template_url_prefix(&self, repository_base: &str) -> String {
        url_join(repository_base, self.template_path)
    }

    /// Builds a record named after the requested alias, with no installed version.
    pub fn to_record(&self, requested_name: &str, repository_base: &str) -> PackageRecord {
        PackageRecord::new(
            requested_name,
            self.metadata_url(repository_base),
            self.template_url_prefix(repository_base),
        )
    }
}
