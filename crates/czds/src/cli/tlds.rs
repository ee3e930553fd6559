use anyhow::{Context, Result};
use clap::Args;
use czds_api::TldMeta;
use tabled::Tabled;

use crate::auth;
use crate::cli::GlobalArgs;
use crate::config::Settings;
use crate::ui::table::Formatter;

#[derive(Args, Clone, Debug)]
pub struct TldsArg {
    /// One JSON object per TLD
    #[arg(long, conflicts_with = "table")]
    pub json: bool,
    /// Aligned table
    #[arg(long)]
    pub table: bool,
}

#[derive(Tabled)]
struct TldRow<'a> {
    #[tabled(rename = "TLD")]
    tld: &'a str,
    #[tabled(rename = "U-LABEL")]
    ulabel: &'a str,
    #[tabled(rename = "STATUS")]
    status: &'a str,
    #[tabled(rename = "SFTP")]
    sftp: bool,
}

impl<'a> From<&'a TldMeta> for TldRow<'a> {
    fn from(meta: &'a TldMeta) -> Self {
        Self {
            tld: &meta.tld,
            ulabel: &meta.ulabel,
            status: &meta.current_status,
            sftp: meta.sftp,
        }
    }
}

pub async fn run(arg: TldsArg, settings: &Settings, global: &GlobalArgs) -> Result<()> {
    let session = auth::authenticate(settings, global.auth_file.as_deref()).await?;
    let tlds = session.tlds().await.context("cannot fetch TLD metadata")?;
    print!("{}", render(&arg, tlds.values())?);
    Ok(())
}

fn render<'a>(arg: &TldsArg, tlds: impl Iterator<Item = &'a TldMeta>) -> Result<String> {
    if arg.table {
        let rows: Vec<TldRow> = tlds.map(TldRow::from).collect();
        let footer = format!("{} TLDs", rows.len());
        let table = Formatter {
            footer: Some(footer),
            ..Default::default()
        }
        .build(rows);
        return Ok(format!("{table}\n"));
    }

    let mut out = String::new();
    for meta in tlds {
        if arg.json {
            out.push_str(&serde_json::to_string(meta)?);
        } else {
            out.push_str(&meta.to_string());
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metas() -> Vec<TldMeta> {
        vec![
            TldMeta {
                tld: "com".into(),
                ulabel: "com".into(),
                current_status: "approved".into(),
                sftp: false,
            },
            TldMeta {
                tld: "xn--p1ai".into(),
                ulabel: "рф".into(),
                current_status: "pending".into(),
                sftp: true,
            },
        ]
    }

    #[test]
    fn test_render_plain() {
        let arg = TldsArg {
            json: false,
            table: false,
        };
        let out = render(&arg, metas().iter()).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.starts_with("tld=com"));
    }

    #[test]
    fn test_render_json_uses_wire_names() {
        let arg = TldsArg {
            json: true,
            table: false,
        };
        let out = render(&arg, metas().iter()).unwrap();
        let first: serde_json::Value = serde_json::from_str(out.lines().next().unwrap()).unwrap();
        assert_eq!(first["currentStatus"], "approved");
        assert_eq!(first["ulable"], "com");
    }

    #[test]
    fn test_render_table() {
        let arg = TldsArg {
            json: false,
            table: true,
        };
        let out = render(&arg, metas().iter()).unwrap();
        assert!(out.contains("STATUS"));
        assert!(out.contains("xn--p1ai"));
        assert!(out.contains("2 TLDs"));
    }
}
