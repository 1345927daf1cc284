//! Download collaborator: fetches paper files from the remote archive into
//! the shelf path layout.
//!
//! The only contract with the core is the path layout the codec expects;
//! retry policy is deliberately absent.

use std::fs;
use std::path::Path;

use anyhow::Context;
use papers::types::{BUSINESS_SUBJECT, ENGLISH_SUBJECT, HINDI_SUBJECT, ICT_SUBJECT};
use papers::{encode_path, extension_for, PaperId, Series, Variant};

const ARCHIVE_BASE: &str =
    "https://pastpapers.papacambridge.com/directories/CAIE/CAIE-pastpapers/upload";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Fetches every variant of every requested (subject, year, series, paper)
/// combination into the shelf layout under `root`.
pub fn fetch_papers(
    root: &Path,
    subjects: &[String],
    years: &[String],
    serieses: &[Series],
    papers: &[String],
) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::new();
    for subject in subjects {
        for year in years {
            for series in serieses {
                for paper in papers {
                    let id = PaperId::new(subject, year, *series, paper);
                    for variant in variants_for(subject, paper) {
                        fetch_variant(&client, root, &id, variant)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Which variants the archive publishes for a paper.
///
/// Every paper has a question paper and marking scheme. English papers and
/// Business papers numbered 2x ship an insert; Hindi paper 02 has listening
/// audio and ICT papers have source-file archives.
fn variants_for(subject: &str, paper_number: &str) -> Vec<Variant> {
    let mut variants = Vec::new();
    if subject == ENGLISH_SUBJECT || (subject == BUSINESS_SUBJECT && paper_number.starts_with('2'))
    {
        variants.push(Variant::In);
    }
    if subject == HINDI_SUBJECT && paper_number == "02" {
        variants.push(Variant::Sf);
    }
    if subject == ICT_SUBJECT {
        variants.push(Variant::Sf);
    }
    variants.push(Variant::Qp);
    variants.push(Variant::Ms);
    variants
}

fn fetch_variant(
    client: &reqwest::blocking::Client,
    root: &Path,
    id: &PaperId,
    variant: Variant,
) -> anyhow::Result<()> {
    let url = remote_url(id, variant)?;
    let response = client
        .get(&url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .with_context(|| format!("failed to request {url}"))?;
    if !response.status().is_success() {
        log::warn!("skipping {url}: HTTP {}", response.status());
        return Ok(());
    }
    let bytes = response
        .bytes()
        .with_context(|| format!("failed to read body of {url}"))?;

    let dest = encode_path(root, id, variant);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&dest, &bytes).with_context(|| format!("failed to write {}", dest.display()))?;
    log::info!("fetched {}", dest.display());
    Ok(())
}

/// Builds the archive URL: `<base>/<subject>_<series-letter><yy>_<tag>_<number>.<ext>`.
fn remote_url(id: &PaperId, variant: Variant) -> anyhow::Result<String> {
    let short_year = id
        .year
        .get(2..)
        .filter(|suffix| suffix.len() == 2)
        .with_context(|| format!("year must be four digits, got {:?}", id.year))?;
    let ext = extension_for(&id.subject, variant);
    Ok(format!(
        "{ARCHIVE_BASE}/{}_{}{}_{}_{}.{ext}",
        id.subject,
        id.series.letter(),
        short_year,
        variant,
        id.paper_number
    ))
}
