use tabled::settings::object::Rows;
use tabled::settings::{Panel, Remove, Style};
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub footer: Option<String>,
    /// Drop the column-name row.
    pub bare: bool,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        if self.bare {
            table.with(Remove::row(Rows::first()));
        }
        if let Some(footer) = self.footer {
            table.with(Panel::footer(footer));
        }

        table.with(Style::blank());
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Tabled)]
    struct Row {
        tld: &'static str,
        status: &'static str,
    }

    #[test]
    fn test_build_with_footer() {
        let rows = [
            Row {
                tld: "com",
                status: "approved",
            },
            Row {
                tld: "net",
                status: "pending",
            },
        ];
        let out = Formatter {
            footer: Some("2 TLDs".into()),
            ..Default::default()
        }
        .build(rows)
        .to_string();

        assert!(out.contains("tld"));
        assert!(out.contains("approved"));
        assert!(out.trim_end().ends_with("2 TLDs"));
    }

    #[test]
    fn test_bare_drops_column_names() {
        let out = Formatter {
            bare: true,
            ..Default::default()
        }
        .build([Row {
            tld: "com",
            status: "approved",
        }])
        .to_string();

        assert!(!out.contains("status"));
        assert!(out.contains("com"));
    }
}
