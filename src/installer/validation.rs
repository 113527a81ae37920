//! install-config validation
//!
//! Collects every problem in one pass so the user can fix the file at once.
//! Messages follow the `Required value` / `Invalid value: "<v>": <why>` /
//! `Duplicate value: "<v>"` convention, keyed by field path.

use std::collections::BTreeSet;

use crate::domain::ports::Validator;
use crate::error::FieldError;

use super::install_config::{Cidr, InstallConfig, Platform};

const SUPPORTED_API_VERSION: &str = "v1";
const ARCHITECTURES: &[&str] = &["amd64", "arm64"];
const MAX_LABEL_LEN: usize = 63;
const MAX_DOMAIN_LEN: usize = 253;

/// Built-in rules for `install-config.yaml`
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallConfigValidator;

impl Validator<InstallConfig> for InstallConfigValidator {
    fn validate(&self, config: &InstallConfig) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate_header(config, &mut errors);
        validate_pools(config, &mut errors);
        validate_networking(config, &mut errors);
        validate_platform(&config.platform, &mut errors);
        errors
    }
}

fn required(field: impl Into<String>) -> FieldError {
    FieldError::new(field, "Required value")
}

fn invalid(field: impl Into<String>, value: &str, why: impl AsRef<str>) -> FieldError {
    FieldError::new(field, format!("Invalid value: \"{value}\": {}", why.as_ref()))
}

fn duplicate(field: impl Into<String>, value: &str) -> FieldError {
    FieldError::new(field, format!("Duplicate value: \"{value}\""))
}

/// RFC 1123 label: lowercase alphanumerics and '-', alphanumeric at both ends
fn dns_label_problem(label: &str) -> Option<&'static str> {
    if label.is_empty() {
        return Some("empty label");
    }
    if label.len() > MAX_LABEL_LEN {
        return Some("must be no more than 63 characters");
    }
    let valid_chars = label
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if !valid_chars {
        return Some("must consist of lower case alphanumeric characters or '-'");
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Some("must start and end with an alphanumeric character");
    }
    None
}

fn validate_header(config: &InstallConfig, errors: &mut Vec<FieldError>) {
    if config.api_version != SUPPORTED_API_VERSION {
        errors.push(invalid(
            "apiVersion",
            &config.api_version,
            format!("install-config version must be \"{SUPPORTED_API_VERSION}\""),
        ));
    }

    let name = &config.metadata.name;
    if name.is_empty() {
        errors.push(required("metadata.name"));
    } else if let Some(problem) = dns_label_problem(name) {
        errors.push(invalid("metadata.name", name, problem));
    }

    let domain = &config.base_domain;
    if domain.is_empty() {
        errors.push(required("baseDomain"));
    } else if domain.len() > MAX_DOMAIN_LEN {
        errors.push(invalid("baseDomain", domain, "must be no more than 253 characters"));
    } else if let Some(problem) = domain.split('.').find_map(dns_label_problem) {
        errors.push(invalid("baseDomain", domain, problem));
    }

    if let Some(key) = &config.ssh_key {
        if key.split_whitespace().count() < 2 {
            errors.push(invalid("sshKey", key, "must be an authorized_keys entry"));
        }
    }
}

fn validate_pools(config: &InstallConfig, errors: &mut Vec<FieldError>) {
    let control = &config.control_plane;
    if control.replicas == 0 {
        errors.push(invalid(
            "controlPlane.replicas",
            "0",
            "at least one control plane machine is required",
        ));
    }
    if !ARCHITECTURES.contains(&control.architecture.as_str()) {
        errors.push(invalid(
            "controlPlane.architecture",
            &control.architecture,
            format!("supported values: {}", ARCHITECTURES.join(", ")),
        ));
    }

    let mut names = BTreeSet::new();
    let first_arch = config.compute.first().map(|p| p.architecture.as_str());
    for (i, pool) in config.compute.iter().enumerate() {
        if pool.name.is_empty() {
            errors.push(required(format!("compute[{i}].name")));
        } else if !names.insert(pool.name.as_str()) {
            errors.push(duplicate(format!("compute[{i}].name"), &pool.name));
        }
        if !ARCHITECTURES.contains(&pool.architecture.as_str()) {
            errors.push(invalid(
                format!("compute[{i}].architecture"),
                &pool.architecture,
                format!("supported values: {}", ARCHITECTURES.join(", ")),
            ));
        } else if Some(pool.architecture.as_str()) != first_arch {
            errors.push(invalid(
                format!("compute[{i}].architecture"),
                &pool.architecture,
                "all compute machine pools must be of the same architecture",
            ));
        }
    }
}

fn validate_networking(config: &InstallConfig, errors: &mut Vec<FieldError>) {
    let net = &config.networking;

    if net.machine_network.is_empty() {
        errors.push(FieldError::new(
            "networking.machineNetwork",
            "at least one machine network is required",
        ));
    }
    for (i, entry) in net.machine_network.iter().enumerate() {
        if let Err(why) = Cidr::parse(&entry.cidr) {
            errors.push(invalid(
                format!("networking.machineNetwork[{i}].cidr"),
                &entry.cidr,
                why,
            ));
        }
    }

    for (i, entry) in net.cluster_network.iter().enumerate() {
        match Cidr::parse(&entry.cidr) {
            Err(why) => errors.push(invalid(
                format!("networking.clusterNetwork[{i}].cidr"),
                &entry.cidr,
                why,
            )),
            Ok(cidr) => {
                let max = if cidr.addr.is_ipv4() { 32 } else { 128 };
                if entry.host_prefix < cidr.prefix || entry.host_prefix > max {
                    errors.push(invalid(
                        format!("networking.clusterNetwork[{i}].hostPrefix"),
                        &entry.host_prefix.to_string(),
                        format!("must be between {} and {max}", cidr.prefix),
                    ));
                }
            }
        }
    }

    for (i, cidr) in net.service_network.iter().enumerate() {
        if let Err(why) = Cidr::parse(cidr) {
            errors.push(invalid(format!("networking.serviceNetwork[{i}]"), cidr, why));
        }
    }
}

fn validate_platform(platform: &Platform, errors: &mut Vec<FieldError>) {
    let Platform::Aws(aws) = platform else {
        return;
    };

    if aws.region.is_empty() {
        errors.push(required("platform.aws.region"));
    }

    let mut seen = BTreeSet::new();
    for (i, subnet) in aws.vpc.subnets.iter().enumerate() {
        let field = format!("platform.aws.vpc.subnets[{i}]");
        if subnet.id.is_empty() {
            errors.push(required(format!("{field}.id")));
        } else if !seen.insert(subnet.id.as_str()) {
            errors.push(duplicate(field, &subnet.id));
        }
    }
}
