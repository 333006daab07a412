/// Rewrites the canonical `%(name)s` parameter placeholders (spec §4.3/§6.2) into the
/// `:name` form the `sqlparser` tokenizer understands natively, so the rest of the
/// pipeline can run an off-the-shelf parser unmodified. This is purely a lexical
/// rewrite; it does not touch string literals because `%(` only appears there as
/// ordinary text, which this scan would also rewrite — callers are expected not to
/// embed that sequence in literals, matching the pyformat convention it mirrors.
pub fn rewrite_pyformat_params(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let bytes = sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && bytes.get(i + 1) == Some(&b'(') {
            if let Some(close) = sql[i + 2..].find(')') {
                let name = &sql[i + 2..i + 2 + close];
                let after = i + 2 + close + 1;
                if after < bytes.len() && bytes[after] == b's' && is_ident(name) {
                    out.push(':');
                    out.push_str(name);
                    i = after + 1;
                    continue;
                }
            }
        }
        out.push(sql[i..].chars().next().unwrap());
        i += sql[i..].chars().next().unwrap().len_utf8();
    }
    out
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_named_placeholders() {
        assert_eq!(
            rewrite_pyformat_params("WHERE id = %(id)s AND name = %(name)s"),
            "WHERE id = :id AND name = :name"
        );
    }

    #[test]
    fn leaves_unrelated_percent_signs_alone() {
        assert_eq!(rewrite_pyformat_params("WHERE x LIKE '50%'"), "WHERE x LIKE '50%'");
    }
}
