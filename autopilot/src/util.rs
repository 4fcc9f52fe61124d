use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_SEED_START: u32 = 0xA57E_0001;

/// Decimal or `0x`-prefixed hex.
pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
    } else {
        s.parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {s}"))
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let mut seeds = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        seeds.push(parse_seed(token)?);
    }
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

/// One seed per line; blank lines and `#` comments are skipped.
pub fn parse_seed_file(path: &Path) -> Result<Vec<u32>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading seed file {}", path.display()))?;
    let mut seeds = Vec::new();
    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        seeds.push(parse_seed(trimmed)?);
    }
    if seeds.is_empty() {
        return Err(anyhow!("seed file {} had no seeds", path.display()));
    }
    Ok(seeds)
}

/// Seed list for a benchmark: a seed file wins over `--seeds`, which wins
/// over an LCG sequence of `seed_count` seeds from `seed_start`.
pub fn resolve_seeds(
    seeds: Option<&str>,
    seed_file: Option<&Path>,
    seed_start: Option<&str>,
    seed_count: u32,
) -> Result<Vec<u32>> {
    if let Some(path) = seed_file {
        return parse_seed_file(path);
    }

    if let Some(csv) = seeds {
        return parse_seed_csv(csv);
    }

    let start = if let Some(start) = seed_start {
        parse_seed(start)?
    } else {
        DEFAULT_SEED_START
    };

    let mut out = Vec::with_capacity(seed_count as usize);
    let mut cur = start;
    for _ in 0..seed_count {
        out.push(cur);
        cur = cur.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    }
    Ok(out)
}

pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_as_decimal_or_hex() {
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert_eq!(parse_seed(" 0xDEADBEEF ").unwrap(), 0xDEAD_BEEF);
        assert_eq!(parse_seed("0X10").unwrap(), 16);
        assert!(parse_seed("").is_err());
        assert!(parse_seed("0xZZ").is_err());
        assert!(parse_seed("-1").is_err());
    }

    #[test]
    fn seed_hex_is_zero_padded() {
        assert_eq!(seed_to_hex(0xAB), "0x000000ab");
    }

    #[test]
    fn csv_skips_blanks_and_rejects_empty() {
        assert_eq!(parse_seed_csv("1, 0x2,,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_seed_csv(" , ").is_err());
    }

    #[test]
    fn seed_file_skips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.txt");
        fs::write(&path, "# fleet\n0x10\n\n7\n").unwrap();
        assert_eq!(parse_seed_file(&path).unwrap(), vec![16, 7]);

        fs::write(&path, "# nothing\n").unwrap();
        assert!(parse_seed_file(&path).is_err());
    }

    #[test]
    fn generated_seeds_follow_the_lcg() {
        let seeds = resolve_seeds(None, None, Some("1"), 3).unwrap();
        assert_eq!(seeds[0], 1);
        assert_eq!(seeds[1], 1_664_525_u32.wrapping_add(1_013_904_223));
        assert_eq!(seeds.len(), 3);

        let defaulted = resolve_seeds(None, None, None, 1).unwrap();
        assert_eq!(defaulted, vec![DEFAULT_SEED_START]);

        let explicit = resolve_seeds(Some("5,6"), None, Some("1"), 9).unwrap();
        assert_eq!(explicit, vec![5, 6]);
    }
}
