//! Constants used in the release scripts

/// The number of characters in a hex-encoded contract address, including the `0x` prefix
pub const ADDRESS_LEN: usize = 42;

/// The size of the trailing window of a bookkeeping record that holds the address.
///
/// One character wider than the address, to tolerate the newline left behind
/// when the deployer's output line is redirected into the file
pub const BOOKKEEPING_WINDOW_LEN: usize = ADDRESS_LEN + 1;

/// The call expression in `TickbitTicket.sol` that embeds the Tickbit contract address
pub const SOLIDITY_ADDRESS_MARKER: &str = "tickbitContract = Tickbit(";

/// The statement terminator closing the Solidity call expression
pub const SOLIDITY_ADDRESS_TERMINATOR: &str = ");";

/// The delimiter between a key and its quoted value in the front-end config files
pub const CONFIG_VALUE_DELIMITER: &str = "\" : \"";

/// The config file line holding the Tickbit contract address
pub const TICKBIT_CONFIG_LINE: usize = 0;

/// The config file line holding the TickbitTicket contract address
pub const TICKBIT_TICKET_CONFIG_LINE: usize = 1;

/// The directory, relative to the project root, holding the bookkeeping records
pub const RELEASE_DIR: &str = "scripts/release";

/// The Tickbit bookkeeping record file name
pub const TICKBIT_BOOKKEEPING_FILE: &str = "currentTickbitContract.txt";

/// The TickbitTicket bookkeeping record file name
pub const TICKBIT_TICKET_BOOKKEEPING_FILE: &str = "currentTickbitTicketContract.txt";

/// The directory, relative to the project root, holding the Solidity sources
pub const CONTRACTS_DIR: &str = "contracts";

/// The Solidity source that references the Tickbit contract address
pub const TICKBIT_TICKET_SOURCE_FILE: &str = "TickbitTicket.sol";

/// The path, relative to a front-end project root, of its contract config
pub const FRONTEND_CONFIG_PATH: &str = "src/solidity/config.js";

/// The default location of the project root
pub const DEFAULT_PROJECT_ROOT: &str = ".";

/// The default location of the back-office front-end project
pub const DEFAULT_BACKOFFICE_ROOT: &str = "../tickbit-backoffice";

/// The default location of the public web front-end project
pub const DEFAULT_WEB_ROOT: &str = "../tickbit-web";

/// The default location of the compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts/contracts";

/// The extension of a Solidity source file
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The extension of a compiled contract artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The default location of the file holding the deployer's private key
pub const DEFAULT_SECRET_PATH: &str = ".secret";

/// The placeholder in RPC URL templates replaced by the provider project ID
pub const PROJECT_ID_PLACEHOLDER: &str = "{project_id}";

/// The default hostport of a locally running development node
pub const DEFAULT_LOCAL_RPC_URL: &str = "http://localhost:8545";

/// The private key of the first account a local development node is seeded with
pub const DEFAULT_LOCAL_PKEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The default number of confirmations to wait for the deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The name of the Solidity compiler command
pub const SOLC_COMMAND: &str = "solc";

/// The `solc` output selection used to produce an artifact
pub const SOLC_COMBINED_JSON: &str = "abi,bin";
