use chrono::NaiveDate;

/// Date part of an acquisition timestamp as `YYYY/MM/DD`.
///
/// Separators of any kind become `/`. When the date cannot be read as a
/// calendar date the separator-normalized text is returned as-is.
pub fn date_path(start_time: &str) -> String {
    let date = start_time
        .trim()
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    let normalized = date
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    match NaiveDate::parse_from_str(&normalized, "%Y/%m/%d")
        .or_else(|_| NaiveDate::parse_from_str(&normalized, "%Y%m%d"))
    {
        Ok(parsed) => parsed.format("%Y/%m/%d").to_string(),
        Err(_) => {
            log::warn!("Could not parse acquisition date '{}', using it verbatim", date);
            normalized
        }
    }
}

/// Storage location hint `{date}/{platform}/{title}` for a product
pub fn build_location(start_time: &str, platform: &str, title: &str) -> String {
    format!("{}/{}/{}", date_path(start_time), platform, title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_location() {
        assert_eq!(
            build_location(
                "2015-07-27T04:47:06.611",
                "S1A",
                "S1A_IW_OCN__2SDV_20150727T044706_20150727T044731_006992_0097D1_F6DA"
            ),
            "2015/07/27/S1A/S1A_IW_OCN__2SDV_20150727T044706_20150727T044731_006992_0097D1_F6DA"
        );
    }

    #[test]
    fn test_date_separators_are_normalized() {
        assert_eq!(date_path("2014-10-03T18:47:39.842715"), "2014/10/03");
        assert_eq!(date_path("2014.10.03 18:47:39"), "2014/10/03");
        assert_eq!(date_path("2014/1/3T00:00:00"), "2014/01/03");
        assert_eq!(date_path("20141003T184739"), "2014/10/03");
    }

    #[test]
    fn test_unparsable_date_is_kept() {
        assert_eq!(date_path("2014-13-45T00:00:00"), "2014/13/45");
        assert_eq!(date_path("unknown"), "unknown");
    }
}
