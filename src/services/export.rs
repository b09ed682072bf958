use crate::models::User;
use chrono::NaiveDate;

pub const CSV_HEADER: &str = "Name,Email,Phone,Address";

/// Lazily renders users as CSV lines: the header first, then one quoted line
/// per record. Lines carry no terminator; [`CsvExport::into_chunks`] joins
/// them with `\n` for transmission.
#[derive(Debug)]
pub struct CsvExport {
    header_sent: bool,
    rows: std::vec::IntoIter<User>,
}

impl CsvExport {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            header_sent: false,
            rows: users.into_iter(),
        }
    }

    /// Number of record lines still to be produced, header excluded.
    pub fn remaining_records(&self) -> usize {
        self.rows.len()
    }

    /// Body chunks for streaming: every line after the first is prefixed
    /// with a newline, so the concatenation has no trailing terminator.
    pub fn into_chunks(self) -> impl Iterator<Item = String> + Send + 'static {
        self.enumerate().map(|(index, line)| {
            if index == 0 {
                line
            } else {
                format!("\n{line}")
            }
        })
    }
}

impl Iterator for CsvExport {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if !self.header_sent {
            self.header_sent = true;
            return Some(CSV_HEADER.to_string());
        }
        self.rows.next().map(|user| csv_row(&user))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.rows.len() + usize::from(!self.header_sent);
        (n, Some(n))
    }
}

impl ExactSizeIterator for CsvExport {}

fn csv_row(user: &User) -> String {
    [&user.name, &user.email, &user.phone, &user.address]
        .iter()
        .map(|value| quote(value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Encloses `value` in double quotes, doubling any embedded quote.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Download name for an export produced on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("users_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(name: &str, email: &str, phone: &str, address: &str) -> User {
        let now = Utc::now();
        User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            address: address.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn unquote(field: &str) -> String {
        field
            .strip_prefix('"')
            .and_then(|f| f.strip_suffix('"'))
            .unwrap_or(field)
            .to_string()
    }

    #[test]
    fn header_comes_first() {
        let mut export = CsvExport::new(vec![]);
        assert_eq!(export.next().as_deref(), Some("Name,Email,Phone,Address"));
        assert_eq!(export.next(), None);
    }

    #[test]
    fn rows_are_quoted() {
        let lines: Vec<String> = CsvExport::new(vec![user(
            "Ada Lovelace",
            "ada@example.com",
            "+442071234567",
            "12 Babbage St, London",
        )])
        .collect();

        assert_eq!(
            lines,
            vec![
                "Name,Email,Phone,Address".to_string(),
                r#""Ada Lovelace","ada@example.com","+442071234567","12 Babbage St, London""#
                    .to_string(),
            ]
        );
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let line = csv_row(&user(
            "Ada \"Countess\" Lovelace",
            "ada@example.com",
            "1",
            "Somewhere",
        ));
        assert!(line.starts_with(r#""Ada ""Countess"" Lovelace","#));
    }

    #[test]
    fn size_hint_counts_header_and_rows() {
        let mut export = CsvExport::new(vec![
            user("A1", "a@example.com", "1", "addr1"),
            user("B1", "b@example.com", "2", "addr2"),
        ]);
        assert_eq!(export.len(), 3);
        export.next();
        assert_eq!(export.len(), 2);
        assert_eq!(export.remaining_records(), 2);
    }

    #[test]
    fn chunks_join_without_trailing_newline() {
        let body: String = CsvExport::new(vec![
            user("Ada", "ada@example.com", "1", "addr one"),
            user("Bob", "bob@example.com", "2", "addr two"),
        ])
        .into_chunks()
        .collect();

        assert_eq!(
            body,
            "Name,Email,Phone,Address\n\
             \"Ada\",\"ada@example.com\",\"1\",\"addr one\"\n\
             \"Bob\",\"bob@example.com\",\"2\",\"addr two\""
        );
    }

    #[test]
    fn export_then_parse_recovers_field_values() {
        let users = vec![
            user("Ada Lovelace", "ada@example.com", "+442071234567", "12 Babbage St, London"),
            user("Grace Hopper", "grace@example.com", "15551234567", "Arlington, VA, USA"),
        ];

        let body: String = CsvExport::new(users.clone()).into_chunks().collect();
        let parsed: Vec<Vec<String>> = body
            .split('\n')
            .skip(1)
            .map(|line| {
                line.trim_start_matches('"')
                    .trim_end_matches('"')
                    .split("\",\"")
                    .map(unquote)
                    .collect()
            })
            .collect();

        assert_eq!(parsed.len(), users.len());
        for (fields, user) in parsed.iter().zip(&users) {
            assert_eq!(fields, &vec![
                user.name.clone(),
                user.email.clone(),
                user.phone.clone(),
                user.address.clone(),
            ]);
        }
    }

    #[test]
    fn filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_filename(date), "users_2024-03-09.csv");
    }
}
