//! Propagation of a freshly deployed contract address into the files that reference it
//!
//! A propagation is planned in full before anything touches the disk: every
//! target is read and every site located up front, so a missing marker in the
//! last file leaves the first one untouched.

use std::{
    ops::Range,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::primitives::Address;
use tracing::{debug, info};

use crate::{
    constants::{
        ADDRESS_LEN, BOOKKEEPING_WINDOW_LEN, CONFIG_VALUE_DELIMITER, CONTRACTS_DIR,
        FRONTEND_CONFIG_PATH, RELEASE_DIR, TICKBIT_TICKET_SOURCE_FILE,
    },
    errors::ScriptError,
    types::{AddressSite, ReleaseContract},
    utils::{read_file, write_file},
};

/// The on-disk locations the release scripts read and patch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleasePaths {
    /// The root of the contracts project
    pub project_root: PathBuf,
    /// The root of the back-office front-end project
    pub backoffice_root: PathBuf,
    /// The root of the public web front-end project
    pub web_root: PathBuf,
}

impl ReleasePaths {
    /// The bookkeeping record of the given contract
    pub fn bookkeeping(&self, contract: ReleaseContract) -> PathBuf {
        self.project_root
            .join(RELEASE_DIR)
            .join(contract.bookkeeping_file())
    }

    /// The Solidity source referencing the Tickbit contract
    pub fn solidity_source(&self) -> PathBuf {
        self.project_root
            .join(CONTRACTS_DIR)
            .join(TICKBIT_TICKET_SOURCE_FILE)
    }

    /// The front-end config files, back-office first
    pub fn frontend_configs(&self) -> [PathBuf; 2] {
        [
            self.backoffice_root.join(FRONTEND_CONFIG_PATH),
            self.web_root.join(FRONTEND_CONFIG_PATH),
        ]
    }
}

/// The new contents of a single file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePatch {
    /// The file to write
    pub path: PathBuf,
    /// The contents read from disk
    pub original: String,
    /// The contents to write back
    pub updated: String,
}

impl FilePatch {
    /// Whether writing the patch would leave the file as it is
    pub fn is_noop(&self) -> bool {
        self.original == self.updated
    }
}

/// A fully planned propagation of one contract's address
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Propagation {
    /// The contract whose address is propagated
    pub contract: ReleaseContract,
    /// The address read from the bookkeeping record
    pub address: String,
    /// The patches to apply, bookkeeping record first
    pub patches: Vec<FilePatch>,
}

/// Re-derive the contract address from a bookkeeping record.
///
/// The address is the first [`ADDRESS_LEN`] characters of the record's last
/// [`BOOKKEEPING_WINDOW_LEN`] characters. A record shorter than the window is
/// taken whole, so a record that already holds just the address yields itself.
pub fn extract_recorded_address(record: &str) -> Result<String, ScriptError> {
    let num_chars = record.chars().count();
    let address: String = record
        .chars()
        .skip(num_chars.saturating_sub(BOOKKEEPING_WINDOW_LEN))
        .take(ADDRESS_LEN)
        .collect();

    if !is_address_literal(&address) {
        return Err(ScriptError::AddressExtraction(format!(
            "`{}` is not a 0x-prefixed {}-character address",
            address.escape_debug(),
            ADDRESS_LEN
        )));
    }

    Ok(address)
}

/// Whether the given string is a `0x`-prefixed, hex-encoded 20-byte address
fn is_address_literal(s: &str) -> bool {
    s.len() == ADDRESS_LEN && s.starts_with("0x") && Address::from_str(s).is_ok()
}

/// Locate the byte range of the address literal at the given site
pub fn locate_site(content: &str, site: &AddressSite) -> Result<Range<usize>, ScriptError> {
    match site {
        AddressSite::SolidityCall { marker, terminator } => {
            let start = content
                .find(marker)
                .ok_or_else(|| ScriptError::PatternMismatch(format!("`{marker}` not found")))?
                + marker.len();
            let len = content[start..].find(terminator).ok_or_else(|| {
                ScriptError::PatternMismatch(format!("`{terminator}` not found after `{marker}`"))
            })?;

            Ok(start..start + len)
        }
        AddressSite::ConfigLine { line } => {
            let mut lines = content.split('\n');
            let line_start: usize = lines.by_ref().take(*line).map(|l| l.len() + 1).sum();
            let line_text = lines.next().ok_or_else(|| {
                ScriptError::PatternMismatch(format!("file has no line {}", line + 1))
            })?;

            let value_start = line_start
                + line_text.find(CONFIG_VALUE_DELIMITER).ok_or_else(|| {
                    ScriptError::PatternMismatch(format!(
                        "no quoted value on line {}",
                        line + 1
                    ))
                })?
                + CONFIG_VALUE_DELIMITER.len();

            // The value runs until the next delimiter, if the line holds more than one
            let rest = &content[value_start..line_start + line_text.len()];
            let value = rest
                .find(CONFIG_VALUE_DELIMITER)
                .map_or(rest, |end| &rest[..end]);

            let value_len = value
                .char_indices()
                .nth(ADDRESS_LEN - 1)
                .map(|(i, c)| i + c.len_utf8())
                .ok_or_else(|| {
                    ScriptError::PatternMismatch(format!(
                        "quoted value on line {} is shorter than an address",
                        line + 1
                    ))
                })?;

            Ok(value_start..value_start + value_len)
        }
    }
}

/// Replace the address literal at the given site, leaving the rest of the content untouched
pub fn splice_address(
    content: &str,
    site: &AddressSite,
    address: &str,
) -> Result<String, ScriptError> {
    let range = locate_site(content, site)?;
    debug!("Replacing `{}` at {}", &content[range.clone()], site);

    let mut updated = String::with_capacity(content.len() - range.len() + address.len());
    updated.push_str(&content[..range.start]);
    updated.push_str(address);
    updated.push_str(&content[range.end..]);
    Ok(updated)
}

/// Read the file at `path` and plan the replacement of the address at `site`
fn plan_site_patch(path: &Path, site: &AddressSite, address: &str) -> Result<FilePatch, ScriptError> {
    let original = read_file(path)?;
    let updated = splice_address(&original, site, address).map_err(|e| match e {
        ScriptError::PatternMismatch(s) => {
            ScriptError::PatternMismatch(format!("{}: {}", path.display(), s))
        }
        e => e,
    })?;

    Ok(FilePatch {
        path: path.to_path_buf(),
        original,
        updated,
    })
}

/// Plan the propagation of the given contract's recorded address.
///
/// Reads every file involved but writes none of them.
pub fn plan_propagation(
    contract: ReleaseContract,
    paths: &ReleasePaths,
) -> Result<Propagation, ScriptError> {
    let bookkeeping_path = paths.bookkeeping(contract);
    let record = read_file(&bookkeeping_path)?;
    let address = extract_recorded_address(&record).map_err(|e| match e {
        ScriptError::AddressExtraction(s) => {
            ScriptError::AddressExtraction(format!("{}: {}", bookkeeping_path.display(), s))
        }
        e => e,
    })?;
    info!("Recorded {} address: {}", contract, address);

    let mut patches = vec![FilePatch {
        path: bookkeeping_path,
        original: record,
        updated: address.clone(),
    }];

    if let Some(site) = contract.solidity_site() {
        patches.push(plan_site_patch(&paths.solidity_source(), &site, &address)?);
    }

    let config_site = contract.config_site();
    for config_path in paths.frontend_configs() {
        patches.push(plan_site_patch(&config_path, &config_site, &address)?);
    }

    Ok(Propagation {
        contract,
        address,
        patches,
    })
}

/// Write the planned patches to disk, skipping files whose contents would not change.
///
/// Returns the paths that were written.
pub fn apply_patches(patches: &[FilePatch]) -> Result<Vec<PathBuf>, ScriptError> {
    let mut written = Vec::with_capacity(patches.len());
    for patch in patches {
        if patch.is_noop() {
            debug!("{} already up to date", patch.path.display());
            continue;
        }

        write_file(&patch.path, &patch.updated)?;
        info!("Updated {}", patch.path.display());
        written.push(patch.path.clone());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use crate::{errors::ScriptError, types::ReleaseContract};

    use super::{extract_recorded_address, locate_site, splice_address};

    const OLD: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const NEW: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";
    const OTHER: &str = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0";

    #[test]
    fn test_extract_with_trailing_newline() {
        let record = format!("Tickbit deployed to: {NEW}\n");
        assert_eq!(extract_recorded_address(&record).unwrap(), NEW);
    }

    #[test]
    fn test_extract_clean_record_is_idempotent() {
        let address = extract_recorded_address(NEW).unwrap();
        assert_eq!(address, NEW);
        assert_eq!(extract_recorded_address(&address).unwrap(), NEW);
    }

    #[test]
    fn test_extract_rejects_malformed_records() {
        // Missing trailing character shifts the window by one
        let record = format!("Tickbit deployed to: {NEW}");
        assert!(matches!(
            extract_recorded_address(&record),
            Err(ScriptError::AddressExtraction(_))
        ));

        assert!(extract_recorded_address("").is_err());
        assert!(extract_recorded_address("0x1234\n").is_err());
        assert!(extract_recorded_address("0xZZbDB2315678afecb367f032d93F642f64180aa3\n").is_err());
    }

    #[test]
    fn test_solidity_site() {
        let source = format!(
            "contract TickbitTicket {{\n    constructor() {{\n        tickbitContract = Tickbit({OLD});\n    }}\n}}\n"
        );
        let site = ReleaseContract::Tickbit.solidity_site().unwrap();

        let range = locate_site(&source, &site).unwrap();
        assert_eq!(&source[range], OLD);

        let updated = splice_address(&source, &site, NEW).unwrap();
        assert_eq!(updated, source.replace(OLD, NEW));
    }

    #[test]
    fn test_solidity_site_only_touches_the_call() {
        // The same literal elsewhere in the file is left alone
        let source = format!("// previously {OLD}\ntickbitContract = Tickbit({OLD});\n");
        let site = ReleaseContract::Tickbit.solidity_site().unwrap();

        let updated = splice_address(&source, &site, NEW).unwrap();
        assert_eq!(updated, format!("// previously {OLD}\ntickbitContract = Tickbit({NEW});\n"));
    }

    #[test]
    fn test_solidity_site_missing_marker() {
        let site = ReleaseContract::Tickbit.solidity_site().unwrap();

        let res = locate_site("contract Empty {}\n", &site);
        assert!(matches!(res, Err(ScriptError::PatternMismatch(_))));

        let res = locate_site("tickbitContract = Tickbit(0x00", &site);
        assert!(matches!(res, Err(ScriptError::PatternMismatch(_))));
    }

    #[test]
    fn test_config_lines() {
        let config = format!("\"tickbit\" : \"{OLD}\",\n\"tickbitTicket\" : \"{OTHER}\",\n");

        let primary = ReleaseContract::Tickbit.config_site();
        let updated = splice_address(&config, &primary, NEW).unwrap();
        assert_eq!(
            updated,
            format!("\"tickbit\" : \"{NEW}\",\n\"tickbitTicket\" : \"{OTHER}\",\n")
        );

        let secondary = ReleaseContract::TickbitTicket.config_site();
        let updated = splice_address(&config, &secondary, NEW).unwrap();
        assert_eq!(
            updated,
            format!("\"tickbit\" : \"{OLD}\",\n\"tickbitTicket\" : \"{NEW}\",\n")
        );
    }

    #[test]
    fn test_config_line_with_shared_address() {
        // Both lines hold the same literal, only the targeted one changes
        let config = format!("\"tickbit\" : \"{OLD}\"\n\"tickbitTicket\" : \"{OLD}\"\n");
        let secondary = ReleaseContract::TickbitTicket.config_site();

        let updated = splice_address(&config, &secondary, NEW).unwrap();
        assert_eq!(
            updated,
            format!("\"tickbit\" : \"{OLD}\"\n\"tickbitTicket\" : \"{NEW}\"\n")
        );
    }

    #[test]
    fn test_config_line_malformed() {
        let secondary = ReleaseContract::TickbitTicket.config_site();
        let primary = ReleaseContract::Tickbit.config_site();

        // Missing line
        let res = locate_site(&format!("\"tickbit\" : \"{OLD}\""), &secondary);
        assert!(matches!(res, Err(ScriptError::PatternMismatch(_))));

        // Missing delimiter
        let res = locate_site(&format!("tickbit: '{OLD}'\n"), &primary);
        assert!(matches!(res, Err(ScriptError::PatternMismatch(_))));

        // Value too short
        let res = locate_site("\"tickbit\" : \"0x00\"\n", &primary);
        assert!(matches!(res, Err(ScriptError::PatternMismatch(_))));
    }
}
