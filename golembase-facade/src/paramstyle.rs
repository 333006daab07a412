/// Normalizes SQLAlchemy's `:name` parameter style to this adapter's canonical
/// `%(name)s` form (spec §4.6), so everything below the façade only ever sees the
/// canonical style. Skips `::` (a cast, not a placeholder) and anything inside a
/// single-quoted string literal.
pub fn normalize_to_pyformat(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let bytes = sql.as_bytes();
    let mut i = 0;
    let mut in_string = false;

    while i < bytes.len() {
        let c = sql[i..].chars().next().unwrap();

        if c == '\'' {
            in_string = !in_string;
            out.push(c);
            i += 1;
            continue;
        }

        if !in_string && c == ':' {
            if bytes.get(i + 1) == Some(&b':') {
                out.push_str("::");
                i += 2;
                continue;
            }
            let rest = &sql[i + 1..];
            let name_len = rest.chars().take_while(|c| c.is_alphanumeric() || *c == '_').count();
            if name_len > 0 {
                let name = &rest[..name_len];
                if is_ident(name) {
                    out.push_str("%(");
                    out.push_str(name);
                    out.push_str(")s");
                    i += 1 + name_len;
                    continue;
                }
            }
        }

        out.push(c);
        i += c.len_utf8();
    }

    out
}

fn is_ident(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_named_placeholders() {
        assert_eq!(
            normalize_to_pyformat("WHERE id = :id AND name = :name"),
            "WHERE id = %(id)s AND name = %(name)s"
        );
    }

    #[test]
    fn leaves_double_colon_casts_alone() {
        assert_eq!(normalize_to_pyformat("SELECT x::int FROM t"), "SELECT x::int FROM t");
    }

    #[test]
    fn leaves_colons_inside_string_literals_alone() {
        assert_eq!(normalize_to_pyformat("WHERE x = 'a:b'"), "WHERE x = 'a:b'");
    }
}
