use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Source of everything the selector lists, plus the final hand-off.
///
/// Every method may block for as long as the backing service takes; the
/// dispatcher runs them on blocking worker threads and enforces deadlines.
pub trait Inventory: Send + Sync {
    fn list_profiles(&self) -> Result<Vec<String>>;

    fn list_regions(&self, profile: &str) -> Result<Vec<String>>;

    /// Display entries shaped `<id>` or `<id> (<name>)`.
    fn list_hosts(&self, profile: &str, region: &str) -> Result<Vec<String>>;

    fn fetch_tags(&self, profile: &str, region: &str, host_id: &str) -> Result<Vec<Tag>>;

    /// Runs the interactive session in the foreground until it ends.
    fn launch_session(&self, profile: &str, region: &str, host_id: &str) -> Result<()>;
}

/// Inventory backed by the `aws` command line tool.
pub struct AwsCli {
    binary: String,
    bootstrap_region: String,
    credentials_file: PathBuf,
}

impl AwsCli {
    pub fn new(config: &Config) -> Self {
        Self {
            binary: config.aws_binary.clone(),
            bootstrap_region: config.bootstrap_region.clone(),
            credentials_file: config.credentials_file.clone(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        debug!(binary = %self.binary, ?args, "running aws cli");
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .with_context(|| format!("launching {}", self.binary))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "{} {} exited with status {}: {}",
                self.binary,
                args.iter().take(2).copied().collect::<Vec<_>>().join(" "),
                output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "unknown".into()),
                stderr.trim()
            ));
        }
        Ok(output.stdout)
    }
}

impl Inventory for AwsCli {
    fn list_profiles(&self) -> Result<Vec<String>> {
        read_profiles(&self.credentials_file)
    }

    fn list_regions(&self, profile: &str) -> Result<Vec<String>> {
        let out = self.run(&[
            "ec2",
            "describe-regions",
            "--profile",
            profile,
            "--region",
            &self.bootstrap_region,
            "--output",
            "json",
        ])?;
        parse_regions(&out)
    }

    fn list_hosts(&self, profile: &str, region: &str) -> Result<Vec<String>> {
        let out = self.run(&[
            "ec2",
            "describe-instances",
            "--profile",
            profile,
            "--region",
            region,
            "--output",
            "json",
        ])?;
        parse_hosts(&out)
    }

    fn fetch_tags(&self, profile: &str, region: &str, host_id: &str) -> Result<Vec<Tag>> {
        let out = self.run(&[
            "ec2",
            "describe-instances",
            "--profile",
            profile,
            "--region",
            region,
            "--instance-ids",
            host_id,
            "--output",
            "json",
        ])?;
        parse_tags(&out)
    }

    fn launch_session(&self, profile: &str, region: &str, host_id: &str) -> Result<()> {
        println!(
            "Running: {} ssm start-session --profile {profile} --region {region} --target {host_id}",
            self.binary
        );
        info!(profile, region, host_id, "starting ssm session");
        let status = Command::new(&self.binary)
            .args([
                "ssm",
                "start-session",
                "--profile",
                profile,
                "--region",
                region,
                "--target",
                host_id,
            ])
            .status()
            .with_context(|| format!("launching {} ssm start-session", self.binary))?;
        if !status.success() {
            return Err(anyhow!(
                "Session exited with status {}",
                status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "unknown".into())
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RegionsResponse {
    #[serde(default)]
    regions: Vec<RegionRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RegionRecord {
    region_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstancesResponse {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Reservation {
    #[serde(default)]
    instances: Vec<InstanceRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstanceRecord {
    instance_id: String,
    #[serde(default)]
    tags: Vec<Tag>,
}

impl InstanceRecord {
    fn display(&self) -> String {
        let name = self
            .tags
            .iter()
            .rev()
            .find(|tag| tag.key == "Name" && !tag.value.is_empty());
        match name {
            Some(tag) => format!("{} ({})", self.instance_id, tag.value),
            None => self.instance_id.clone(),
        }
    }
}

fn parse_regions(json: &[u8]) -> Result<Vec<String>> {
    let response: RegionsResponse =
        serde_json::from_slice(json).context("decode describe-regions output")?;
    Ok(response
        .regions
        .into_iter()
        .map(|r| r.region_name)
        .collect())
}

fn parse_hosts(json: &[u8]) -> Result<Vec<String>> {
    let response: InstancesResponse =
        serde_json::from_slice(json).context("decode describe-instances output")?;
    Ok(response
        .reservations
        .iter()
        .flat_map(|res| res.instances.iter())
        .map(InstanceRecord::display)
        .collect())
}

fn parse_tags(json: &[u8]) -> Result<Vec<Tag>> {
    let response: InstancesResponse =
        serde_json::from_slice(json).context("decode describe-instances output")?;
    Ok(response
        .reservations
        .into_iter()
        .flat_map(|res| res.instances)
        .flat_map(|inst| inst.tags)
        .collect())
}

fn read_profiles(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading credentials {}", path.display()))?;
    let profiles = parse_profiles(&contents);
    if profiles.is_empty() {
        bail!("no profiles in {}", path.display());
    }
    Ok(profiles)
}

/// Section names of an INI credentials file, in file order.
fn parse_profiles(contents: &str) -> Vec<String> {
    let mut profiles: Vec<String> = Vec::new();
    for line in contents.lines().map(str::trim) {
        let Some(name) = line
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .map(str::trim)
        else {
            continue;
        };
        if name.is_empty() || name == "DEFAULT" || profiles.iter().any(|p| p == name) {
            continue;
        }
        profiles.push(name.to_string());
    }
    profiles
}
