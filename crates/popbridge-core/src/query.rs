// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Query-string helpers.

use url::Url;

use crate::error::Result;

/// Merge `params` into the query string of `url`.
///
/// A parameter replaces any existing one with the same key. Empty values are
/// kept (`useraction=`), and existing parameters keep their order.
pub fn extend_url(url: &str, params: &[(&str, &str)]) -> Result<String> {
    let mut parsed = Url::parse(url)?;
    if params.is_empty() {
        return Ok(parsed.into());
    }

    let mut pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !params.iter().any(|(k, _)| k == key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.extend(params.iter().map(|(k, v)| (k.to_string(), v.to_string())));

    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(parsed.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_to_bare_url() {
        let url = extend_url("https://a.test/checkoutnow", &[("token", "EC-1")]).unwrap();
        assert_eq!(url, "https://a.test/checkoutnow?token=EC-1");
    }

    #[test]
    fn keeps_empty_values() {
        let url = extend_url(
            "https://a.test/checkoutnow",
            &[("useraction", ""), ("native_xo", "1")],
        )
        .unwrap();
        assert_eq!(url, "https://a.test/checkoutnow?useraction=&native_xo=1");
    }

    #[test]
    fn replaces_existing_keys_in_place_of_appending_twice() {
        let url = extend_url("https://a.test/x?a=1&token=old&b=2", &[("token", "new")]).unwrap();
        assert_eq!(url, "https://a.test/x?a=1&b=2&token=new");
    }

    #[test]
    fn no_params_leaves_url_alone() {
        let url = extend_url("https://a.test/x?a=1", &[]).unwrap();
        assert_eq!(url, "https://a.test/x?a=1");
    }

    #[test]
    fn rejects_relative_urls() {
        assert!(extend_url("/checkoutnow", &[("token", "EC-1")]).is_err());
    }
}
