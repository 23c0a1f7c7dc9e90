use crate::error::{FmError, FmResult};
use crate::shell::Shell;
use super::utils::{current_user, render_table, required_arg};
use super::ExecContext;
use std::str::FromStr;
use sysinfo::System;

#[cfg(windows)]
pub const EOL: &str = "\r\n";
#[cfg(not(windows))]
pub const EOL: &str = "\n";

/// Keys accepted by `os`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostProperty {
    Eol,
    Cpus,
    HomeDir,
    Username,
    Architecture,
}

impl FromStr for HostProperty {
    type Err = FmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "--EOL" => Ok(HostProperty::Eol),
            "--cpus" => Ok(HostProperty::Cpus),
            "--homedir" => Ok(HostProperty::HomeDir),
            "--username" => Ok(HostProperty::Username),
            "--architecture" => Ok(HostProperty::Architecture),
            other => Err(FmError::InvalidArgument(format!("unknown os key '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpuInfo {
    pub model: String,
    /// Clock speed in MHz as reported by the OS.
    pub frequency_mhz: u64,
}

/// Per-core model and clock speed.
pub fn cpu_info() -> Vec<CpuInfo> {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    sys.cpus()
        .iter()
        .map(|cpu| CpuInfo {
            model: cpu.brand().trim().to_string(),
            frequency_mhz: cpu.frequency(),
        })
        .collect()
}

impl Shell {
    pub(crate) async fn cmd_os(&mut self, args: &[String], ctx: &mut ExecContext) -> FmResult<()> {
        let property: HostProperty = required_arg(args, 0, "os key")?.parse()?;

        match property {
            HostProperty::Eol => ctx.stdout.writeln(&format!("{EOL:?}"))?,
            HostProperty::Cpus => {
                let cpus = tokio::task::spawn_blocking(cpu_info)
                    .await
                    .map_err(|e| FmError::io("cpu info", std::io::Error::other(e)))?;
                ctx.stdout
                    .writeln(&format!("Overall amount of CPUs: {}", cpus.len()))?;
                let rows: Vec<Vec<String>> = cpus
                    .iter()
                    .map(|cpu| {
                        vec![
                            cpu.model.clone(),
                            format!("{:.2} GHz", cpu.frequency_mhz as f64 / 1000.0),
                        ]
                    })
                    .collect();
                ctx.stdout
                    .write(render_table(&["Model", "Clock rate"], &rows).as_bytes())?;
            }
            HostProperty::HomeDir => {
                let home = dirs::home_dir().unwrap_or_else(|| self.home.clone());
                ctx.stdout.writeln(&home.display().to_string())?;
            }
            HostProperty::Username => ctx.stdout.writeln(&current_user())?,
            HostProperty::Architecture => ctx.stdout.writeln(std::env::consts::ARCH)?,
        }
        Ok(())
    }
}
