//! supervisord config rendering.
//!
//! Templates use `{{NAME}}` placeholders naming `SetupConfig` fields (see
//! `SetupConfig::field`). Rendering is a single pass: substituted values are
//! copied verbatim and never scanned for placeholders themselves.

use crate::error::{Result, SetupError};
use airflow_setup_config::{SetupConfig, SetupSettings};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A named template body.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub name: &'static str,
    pub body: &'static str,
}

/// supervisord daemon configuration.
pub const SUPERVISOR_TEMPLATE: Template = Template {
    name: "supervisor",
    body: r#"
[unix_http_server]
file={{SUPERVISOR_SOCK_PATH}}
chmod=0700

[supervisord]
logfile={{SUPERVISOR_LOG_PATH}}
pidfile=/var/run/supervisord.pid
childlogdir=/var/log/supervisor
user={{AIRFLOW_USER}}

[rpcinterface:supervisor]
supervisor.rpcinterface_factory = supervisor.rpcinterface:make_main_rpcinterface

[supervisorctl]
serverurl=unix://{{SUPERVISOR_SOCK_PATH}}

[include]
files = {{SUPERVISOR_DIR}}/*.conf
"#,
};

/// Program stanzas for the four Airflow services.
pub const AIRFLOW_TEMPLATE: Template = Template {
    name: "airflow",
    body: r#"
[program:airflow-apiserver]
command={{AIRFLOW_ENV}}/bin/airflow api-server --port {{AIRFLOW_PORT}}
directory={{AIRFLOW_HOME}}
user={{AIRFLOW_USER}}
autostart=true
autorestart=true
startsecs=10
stopwaitsecs=20
stdout_logfile={{LOG_DIR}}/airflow-apiserver.out.log
stderr_logfile={{LOG_DIR}}/airflow-apiserver.err.log
environment=AIRFLOW_HOME="{{AIRFLOW_HOME}}"

[program:airflow-scheduler]
command={{AIRFLOW_ENV}}/bin/airflow scheduler
directory={{AIRFLOW_HOME}}
user={{AIRFLOW_USER}}
autostart=true
autorestart=true
startsecs=10
stopwaitsecs=20
stdout_logfile={{LOG_DIR}}/airflow-scheduler.out.log
stderr_logfile={{LOG_DIR}}/airflow-scheduler.err.log
environment=AIRFLOW_HOME="{{AIRFLOW_HOME}}"

[program:airflow-dag-processor]
command={{AIRFLOW_ENV}}/bin/airflow dag-processor
directory={{AIRFLOW_HOME}}
user={{AIRFLOW_USER}}
autostart=true
autorestart=true
startsecs=10
stopwaitsecs=20
stdout_logfile={{LOG_DIR}}/airflow-dag-processor.out.log
stderr_logfile={{LOG_DIR}}/airflow-dag-processor.err.log
environment=AIRFLOW_HOME="{{AIRFLOW_HOME}}"

[program:airflow-triggerer]
command={{AIRFLOW_ENV}}/bin/airflow triggerer
directory={{AIRFLOW_HOME}}
user={{AIRFLOW_USER}}
autostart=true
autorestart=true
startsecs=10
stopwaitsecs=20
stdout_logfile={{LOG_DIR}}/airflow-triggerer.out.log
stderr_logfile={{LOG_DIR}}/airflow-triggerer.err.log
environment=AIRFLOW_HOME="{{AIRFLOW_HOME}}"
"#,
};

/// Fill a template from the configuration record.
///
/// Unknown placeholder names and unterminated `{{` are errors.
pub fn render(template: &Template, config: &SetupConfig) -> Result<String> {
    let mut output = String::with_capacity(template.body.len());
    let mut rest = template.body;

    while let Some(start) = rest.find(OPEN) {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let end = after_open.find(CLOSE).ok_or_else(|| {
            SetupError::template(
                template.name,
                format!("unterminated placeholder at byte {}", template.body.len() - rest.len() + start),
            )
        })?;

        let name = &after_open[..end];
        let value = config.field(name).ok_or_else(|| {
            SetupError::template(template.name, format!("unknown placeholder '{}'", name))
        })?;
        output.push_str(value);

        rest = &after_open[end + CLOSE.len()..];
    }
    output.push_str(rest);

    Ok(output)
}

/// Render both configs and write them into `output_dir`.
///
/// Both templates are rendered before anything is written, so a template
/// error leaves the directory untouched. Existing files are truncated.
pub fn write_configs(
    config: &SetupConfig,
    settings: &SetupSettings,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let outputs = [
        (&settings.supervisor_conf_name, render(&SUPERVISOR_TEMPLATE, config)?),
        (&settings.airflow_conf_name, render(&AIRFLOW_TEMPLATE, config)?),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (file_name, content) in outputs {
        let path = output_dir.join(file_name);
        fs::write(&path, content).map_err(|source| SetupError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Wrote config");
        written.push(path);
    }
    Ok(written)
}
