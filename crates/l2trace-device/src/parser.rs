//! Template-driven parsing of CLI output into records.
//!
//! A template names the platform and command it applies to, a regex that
//! marks the first line of each record, and one regex per field. Each field
//! regex runs against the text of one record; its first capture group is the
//! value.
//!
//! Built-in templates are compiled into the crate. A template directory may
//! be supplied through [`ParserConfig`]; its `*.yaml` files replace built-in
//! templates for the same platform and command, or add new ones.
//!
//! # Template format
//!
//! ```yaml
//! platform: cisco_ios
//! command: show cdp neighbors detail
//! record_start: '^-{3,}\s*$'
//! fields:
//!   - name: local_port
//!     pattern: '(?m)^Interface:[ \t]*([^,\s]+)'
//! ```

use l2trace_types::OsFamily;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{DeviceError, DeviceResult};
use crate::record::Record;

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "cisco_ios_show_cdp_neighbors_detail.yaml",
        include_str!("../templates/cisco_ios_show_cdp_neighbors_detail.yaml"),
    ),
    (
        "cisco_nxos_show_cdp_neighbors_detail.yaml",
        include_str!("../templates/cisco_nxos_show_cdp_neighbors_detail.yaml"),
    ),
];

/// Converts raw command output into ordered records.
pub trait CliParser: Send + Sync {
    fn parse(&self, os: OsFamily, command: &str, output: &str) -> DeviceResult<Vec<Record>>;
}

/// Parser configuration, injected at construction.
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Directory of additional or overriding `*.yaml` templates.
    pub template_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct TemplateSpec {
    platform: String,
    command: String,
    record_start: String,
    fields: Vec<FieldSpec>,
}

#[derive(Debug, Deserialize)]
struct FieldSpec {
    name: String,
    pattern: String,
}

#[derive(Debug)]
struct Template {
    platform: String,
    command: String,
    record_start: Regex,
    fields: Vec<(String, Regex)>,
}

impl Template {
    fn load(source_name: &str, yaml: &str) -> DeviceResult<Self> {
        let spec: TemplateSpec = serde_yaml::from_str(yaml)
            .map_err(|e| DeviceError::template(source_name, e.to_string()))?;

        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| DeviceError::template(source_name, e.to_string()))
        };

        let record_start = compile(&spec.record_start)?;
        let fields = spec
            .fields
            .iter()
            .map(|f| -> DeviceResult<(String, Regex)> { Ok((f.name.clone(), compile(&f.pattern)?)) })
            .collect::<DeviceResult<Vec<_>>>()?;

        if fields.is_empty() {
            return Err(DeviceError::template(source_name, "template declares no fields"));
        }

        Ok(Self {
            platform: spec.platform,
            command: normalize_command(&spec.command),
            record_start,
            fields,
        })
    }

    fn matches(&self, platform: &str, command: &str) -> bool {
        self.platform == platform && self.command == command
    }

    fn parse(&self, output: &str) -> Vec<Record> {
        self.split_records(output)
            .into_iter()
            .filter_map(|block| {
                let record: Record = self
                    .fields
                    .iter()
                    .filter_map(|(name, re)| {
                        let value = re.captures(&block)?.get(1)?.as_str().trim();
                        Some((name.clone(), value.to_string()))
                    })
                    .collect();
                (!record.is_empty()).then_some(record)
            })
            .collect()
    }

    /// Splits output at record-start lines. Text before the first start line
    /// is a header and is dropped, unless no start line exists at all.
    fn split_records(&self, output: &str) -> Vec<String> {
        let mut blocks: Vec<Vec<&str>> = Vec::new();
        let mut header: Vec<&str> = Vec::new();

        for line in output.lines() {
            if self.record_start.is_match(line) {
                blocks.push(Vec::new());
            } else if let Some(current) = blocks.last_mut() {
                current.push(line);
            } else {
                header.push(line);
            }
        }

        if blocks.is_empty() {
            blocks.push(header);
        }

        blocks.into_iter().map(|lines| lines.join("\n")).collect()
    }
}

fn normalize_command(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Regex template parser.
#[derive(Debug)]
pub struct TemplateParser {
    templates: Vec<Template>,
}

impl TemplateParser {
    /// Parser with only the built-in templates.
    pub fn builtin() -> DeviceResult<Self> {
        let templates = BUILTIN_TEMPLATES
            .iter()
            .map(|(name, yaml)| Template::load(name, yaml))
            .collect::<DeviceResult<Vec<_>>>()?;
        Ok(Self { templates })
    }

    /// Parser with the built-in templates plus those in `config.template_dir`.
    pub fn new(config: &ParserConfig) -> DeviceResult<Self> {
        let mut parser = Self::builtin()?;
        if let Some(dir) = &config.template_dir {
            parser.load_dir(dir)?;
        }
        Ok(parser)
    }

    fn load_dir(&mut self, dir: &Path) -> DeviceResult<()> {
        let entries = fs::read_dir(dir).map_err(|e| {
            DeviceError::template(dir.display().to_string(), format!("cannot read directory: {}", e))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "yaml" || ext == "yml"))
            .collect();
        paths.sort();

        for path in paths {
            let source_name = path.display().to_string();
            let yaml = fs::read_to_string(&path)
                .map_err(|e| DeviceError::template(&source_name, e.to_string()))?;
            let template = Template::load(&source_name, &yaml)?;
            info!(
                template = %source_name,
                platform = %template.platform,
                command = %template.command,
                "Loaded output template"
            );
            self.insert(template);
        }
        Ok(())
    }

    fn insert(&mut self, template: Template) {
        self.templates
            .retain(|t| !t.matches(&template.platform, &template.command));
        self.templates.push(template);
    }
}

impl CliParser for TemplateParser {
    fn parse(&self, os: OsFamily, command: &str, output: &str) -> DeviceResult<Vec<Record>> {
        let command = normalize_command(command);
        let platform = os.platform();

        let template = self
            .templates
            .iter()
            .find(|t| t.matches(platform, &command))
            .ok_or_else(|| DeviceError::TemplateNotFound {
                platform: platform.to_string(),
                command: command.clone(),
            })?;

        let records = template.parse(output);
        debug!(platform, command = %command, records = records.len(), "Parsed command output");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValuesExt;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const IOS_CDP: &str = "\
-------------------------
Device ID: dist-sw2.example.net
Entry address(es): 
  IP address: 10.20.0.2
Platform: cisco WS-C3850-24T,  Capabilities: Switch IGMP 
Interface: GigabitEthernet1/0/24,  Port ID (outgoing port): GigabitEthernet1/0/48
Holdtime : 150 sec

Version :
Cisco IOS Software, IOS-XE Software, Catalyst L3 Switch Software (CAT3K_CAA-UNIVERSALK9-M), Version 16.3.7, RELEASE SOFTWARE (fc4)
Technical Support: http://www.cisco.com/techsupport

advertisement version: 2
Management address(es): 
  IP address: 10.20.0.2

-------------------------
Device ID: SEP001122334455
Entry address(es): 
  IP address: 10.30.1.50
Platform: Cisco IP Phone 8845,  Capabilities: Host 
Interface: GigabitEthernet1/0/7,  Port ID (outgoing port): Port 1
Holdtime : 170 sec

Version :
sip8845_65.12-8-1-0001-455

advertisement version: 2
";

    const NXOS_CDP: &str = "\
----------------------------------------
Device ID:core-n9k-1(FDO21120U8Q)
System Name: core-n9k-1

Interface address(es): 1
    IPv4 Address: 10.0.0.1
Platform: N9K-C93180YC-EX, Capabilities: Router Switch IGMP Filtering Supports-STP-Dispute
Interface: Ethernet1/49, Port ID (outgoing port): Ethernet1/49
Holdtime: 147 sec

Version:
Cisco Nexus Operating System (NX-OS) Software, Version 9.3(5)

Advertisement Version: 2

Native VLAN: 1
Duplex: full

MTU: 9216
Mgmt address(es):
    IPv4 Address: 172.16.0.1
";

    #[test]
    fn test_builtin_templates_load() {
        let parser = TemplateParser::builtin().unwrap();
        assert_eq!(parser.templates.len(), 2);
    }

    #[test]
    fn test_parse_ios_cdp_detail() {
        let parser = TemplateParser::builtin().unwrap();
        let records = parser
            .parse(OsFamily::Ios, "show cdp neighbors detail", IOS_CDP)
            .unwrap();

        assert_eq!(records.len(), 2);

        let switch = &records[0];
        assert_eq!(switch.get_field("destination_host"), Some("dist-sw2.example.net"));
        assert_eq!(switch.get_field("management_ip"), Some("10.20.0.2"));
        assert_eq!(switch.get_field("platform"), Some("cisco WS-C3850-24T"));
        assert_eq!(switch.get_field("local_port"), Some("GigabitEthernet1/0/24"));
        assert_eq!(switch.get_field("remote_port"), Some("GigabitEthernet1/0/48"));
        assert_eq!(switch.get_field("capabilities"), Some("Switch IGMP"));
        assert!(switch
            .get_field("software_version")
            .unwrap()
            .starts_with("Cisco IOS Software, IOS-XE Software"));

        let phone = &records[1];
        assert_eq!(phone.get_field("capabilities"), Some("Host"));
        assert_eq!(phone.get_field("local_port"), Some("GigabitEthernet1/0/7"));
        assert_eq!(phone.get_field("management_ip"), Some("10.30.1.50"));
    }

    #[test]
    fn test_parse_nxos_cdp_detail() {
        let parser = TemplateParser::builtin().unwrap();
        let records = parser
            .parse(OsFamily::Nxos, "show  cdp neighbors  detail", NXOS_CDP)
            .unwrap();

        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.get_field("dest_host"), Some("core-n9k-1(FDO21120U8Q)"));
        assert_eq!(rec.get_field("mgmt_ip"), Some("172.16.0.1"));
        assert_eq!(rec.get_field("interface_ip"), Some("10.0.0.1"));
        assert_eq!(rec.get_field("local_port"), Some("Ethernet1/49"));
        assert_eq!(
            rec.get_field("version"),
            Some("Cisco Nexus Operating System (NX-OS) Software, Version 9.3(5)")
        );
        assert!(!rec.has_field("management_ip"));
    }

    #[test]
    fn test_parse_empty_output_has_no_records() {
        let parser = TemplateParser::builtin().unwrap();
        let records = parser
            .parse(OsFamily::Ios, "show cdp neighbors detail", "")
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_unknown_command() {
        let parser = TemplateParser::builtin().unwrap();
        let err = parser
            .parse(OsFamily::Ios, "show version", "Cisco IOS Software")
            .unwrap_err();
        assert!(matches!(err, DeviceError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_template_dir_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("ios_cdp.yaml")).unwrap();
        writeln!(
            file,
            r#"platform: cisco_ios
command: show cdp neighbors detail
record_start: '^=+$'
fields:
  - name: local_port
    pattern: '(?m)^Local:\s*(\S+)'"#
        )
        .unwrap();
        // Non-template files are ignored.
        fs::write(dir.path().join("README.txt"), "not a template").unwrap();

        let parser = TemplateParser::new(&ParserConfig {
            template_dir: Some(dir.path().to_path_buf()),
        })
        .unwrap();
        assert_eq!(parser.templates.len(), 2);

        let records = parser
            .parse(
                OsFamily::Ios,
                "show cdp neighbors detail",
                "====\nLocal: Gi1/0/1\n====\nLocal: Gi1/0/2\n",
            )
            .unwrap();
        assert_eq!(
            records,
            vec![
                vec![("local_port".to_string(), "Gi1/0/1".to_string())],
                vec![("local_port".to_string(), "Gi1/0/2".to_string())],
            ]
        );
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("broken.yaml"),
            "platform: cisco_ios\ncommand: show x\nrecord_start: '('\nfields: []\n",
        )
        .unwrap();

        let err = TemplateParser::new(&ParserConfig {
            template_dir: Some(dir.path().to_path_buf()),
        })
        .unwrap_err();
        assert!(matches!(err, DeviceError::Template { .. }));
    }

    #[test]
    fn test_missing_template_dir() {
        let err = TemplateParser::new(&ParserConfig {
            template_dir: Some(PathBuf::from("/nonexistent/l2trace/templates")),
        })
        .unwrap_err();
        assert!(matches!(err, DeviceError::Template { .. }));
    }
}
