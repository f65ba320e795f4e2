//! Tests of the token & NFT deployment sequence against a mock deployer

use std::{
    cell::{Cell, RefCell},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    primitives::{address, Address, Bytes, TxHash},
};
use deploy_scripts::{
    deploy_contracts,
    deployer::ContractDeployer,
    errors::ScriptError,
    types::{default_deployment_targets, DeployedContract, PendingDeployment},
};

/// The creation bytecode used for both fixture contracts
const BYTECODE: [u8; 4] = [0x60, 0x80, 0x60, 0x40];

/// The account the mock deploys from
const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

// -----------
// | Harness |
// -----------

/// An observable step of a deployment run
#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    /// A creation transaction was sent for the contract
    Sent(String),
    /// The contract's deployment was confirmed
    Confirmed(String),
    /// A line was written to the output
    Logged(String),
}

/// A shared, ordered log of events
type EventLog = Rc<RefCell<Vec<Event>>>;

/// The step at which the mock deployer fails
#[derive(Clone, Copy, PartialEq, Eq)]
enum FailAt {
    /// Sending the creation transaction
    Send,
    /// Waiting for confirmation
    Confirm,
}

/// A deployer which derives addresses from an incrementing nonce, as a node would
struct MockDeployer {
    /// The next nonce of the deployer account
    nonce: Cell<u64>,
    /// The calldata of every creation transaction sent, by contract
    calldata: RefCell<Vec<(String, Bytes)>>,
    /// The events observed so far
    events: EventLog,
    /// A contract whose deployment fails, and where
    failure: Option<(&'static str, FailAt)>,
}

impl MockDeployer {
    fn new(events: EventLog) -> Self {
        Self { nonce: Cell::new(0), calldata: RefCell::default(), events, failure: None }
    }

    fn failing(events: EventLog, contract: &'static str, at: FailAt) -> Self {
        Self { failure: Some((contract, at)), ..Self::new(events) }
    }

    fn fails(&self, contract: &str, at: FailAt) -> bool {
        matches!(self.failure, Some((c, f)) if c == contract && f == at)
    }

    fn calldata_for(&self, contract: &str) -> Bytes {
        self.calldata
            .borrow()
            .iter()
            .find(|(c, _)| c == contract)
            .map(|(_, data)| data.clone())
            .unwrap()
    }
}

impl ContractDeployer for MockDeployer {
    async fn send_deployment(
        &self,
        contract: &str,
        calldata: Bytes,
    ) -> Result<PendingDeployment, ScriptError> {
        self.events.borrow_mut().push(Event::Sent(contract.to_string()));
        if self.fails(contract, FailAt::Send) {
            return Err(ScriptError::ContractDeployment("insufficient funds".to_string()));
        }

        self.calldata.borrow_mut().push((contract.to_string(), calldata));
        let nonce = self.nonce.get();
        self.nonce.set(nonce + 1);

        let mut tx_hash = TxHash::ZERO;
        tx_hash[24..].copy_from_slice(&nonce.to_be_bytes());
        Ok(PendingDeployment::new(contract, tx_hash))
    }

    async fn wait_for_deployment(
        &self,
        pending: PendingDeployment,
    ) -> Result<DeployedContract, ScriptError> {
        if self.fails(pending.contract(), FailAt::Confirm) {
            return Err(ScriptError::DeploymentConfirmation("tx reverted".to_string()));
        }
        self.events.borrow_mut().push(Event::Confirmed(pending.contract().to_string()));

        let nonce = u64::from_be_bytes(pending.tx_hash()[24..].try_into().unwrap());
        Ok(pending.into_deployed(DEPLOYER.create(nonce)))
    }
}

/// An output which records each completed line as an event
struct EventWriter {
    /// The events observed so far
    events: EventLog,
    /// Bytes written since the last newline
    partial: String,
}

impl Write for EventWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(idx) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=idx).collect();
            self.events.borrow_mut().push(Event::Logged(line.trim_end().to_string()));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Create a fresh directory holding the token and NFT artifacts
fn artifacts_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("deploy-scripts-it-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);

    let bytecode = alloy::hex::encode_prefixed(BYTECODE);
    write_fixture(&dir, "MyERC20", "[]", &bytecode);
    write_fixture(
        &dir,
        "MyERC721",
        r#"[{
            "type": "constructor",
            "stateMutability": "nonpayable",
            "inputs": [
                { "name": "name_", "type": "string", "internalType": "string" },
                { "name": "symbol_", "type": "string", "internalType": "string" }
            ]
        }]"#,
        &bytecode,
    );

    dir
}

/// Write a hardhat-style artifact for the named contract
fn write_fixture(dir: &Path, name: &str, abi: &str, bytecode: &str) {
    let source_dir = dir.join(format!("contracts/{name}.sol"));
    fs::create_dir_all(&source_dir).unwrap();

    let artifact = format!(
        r#"{{
            "_format": "hh-sol-artifact-1",
            "contractName": "{name}",
            "sourceName": "contracts/{name}.sol",
            "abi": {abi},
            "bytecode": "{bytecode}",
            "deployedBytecode": "0x"
        }}"#
    );
    fs::write(source_dir.join(format!("{name}.json")), artifact).unwrap();
}

/// Run the default deployment, collecting the written lines
async fn run(
    deployer: &MockDeployer,
    artifacts: &Path,
    deployments: Option<&Path>,
    events: &EventLog,
) -> Result<Vec<DeployedContract>, ScriptError> {
    let mut out = EventWriter { events: events.clone(), partial: String::new() };
    deploy_contracts(deployer, &default_deployment_targets(), artifacts, deployments, &mut out)
        .await
}

/// The lines written to the output so far
fn logged_lines(events: &EventLog) -> Vec<String> {
    events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Logged(line) => Some(line.clone()),
            _ => None,
        })
        .collect()
}

/// Whether the line has the form `<label> deployed to: 0x<40 hex chars>`
fn is_address_line(line: &str, label: &str) -> bool {
    line.strip_prefix(&format!("{label} deployed to: 0x"))
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

// ---------
// | Tests |
// ---------

#[tokio::test]
async fn logs_token_then_nft_address() {
    let dir = artifacts_dir("success");
    let events = EventLog::default();
    let deployer = MockDeployer::new(events.clone());

    let deployed = run(&deployer, &dir, None, &events).await.unwrap();

    let lines = logged_lines(&events);
    assert_eq!(lines.len(), 2);
    assert!(is_address_line(&lines[0], "MyERC20"), "{}", lines[0]);
    assert!(is_address_line(&lines[1], "MyERC721"), "{}", lines[1]);

    assert_eq!(deployed[0].contract(), "MyERC20");
    assert_eq!(deployed[1].contract(), "MyERC721");
    assert_eq!(lines[0], format!("MyERC20 deployed to: {}", deployed[0].address()));
    assert_eq!(lines[1], format!("MyERC721 deployed to: {}", deployed[1].address()));
}

#[tokio::test]
async fn addresses_are_logged_only_after_confirmation() {
    let dir = artifacts_dir("ordering");
    let events = EventLog::default();
    let deployer = MockDeployer::new(events.clone());

    let deployed = run(&deployer, &dir, None, &events).await.unwrap();

    let expected = vec![
        Event::Sent("MyERC20".to_string()),
        Event::Confirmed("MyERC20".to_string()),
        Event::Logged(format!("MyERC20 deployed to: {}", deployed[0].address())),
        Event::Sent("MyERC721".to_string()),
        Event::Confirmed("MyERC721".to_string()),
        Event::Logged(format!("MyERC721 deployed to: {}", deployed[1].address())),
    ];
    assert_eq!(*events.borrow(), expected);
}

#[tokio::test]
async fn token_failure_skips_nft() {
    let dir = artifacts_dir("token-failure");
    let events = EventLog::default();
    let deployer = MockDeployer::failing(events.clone(), "MyERC20", FailAt::Send);

    let res = run(&deployer, &dir, None, &events).await;

    assert!(matches!(res, Err(ScriptError::ContractDeployment(_))));
    assert_eq!(*events.borrow(), vec![Event::Sent("MyERC20".to_string())]);
}

#[tokio::test]
async fn nft_failure_keeps_token_address() {
    let dir = artifacts_dir("nft-failure");
    let deployments = dir.join("deployments.json");
    let events = EventLog::default();
    let deployer = MockDeployer::failing(events.clone(), "MyERC721", FailAt::Confirm);

    let res = run(&deployer, &dir, Some(&deployments), &events).await;
    assert!(matches!(res, Err(ScriptError::DeploymentConfirmation(_))));

    let lines = logged_lines(&events);
    assert_eq!(lines.len(), 1);
    assert!(is_address_line(&lines[0], "MyERC20"));

    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&deployments).unwrap()).unwrap();
    let token: Address = record["deployments"]["erc20_contract"].as_str().unwrap().parse().unwrap();
    assert_eq!(lines[0], format!("MyERC20 deployed to: {token}"));
    assert!(record["deployments"].get("erc721_contract").is_none());
}

#[tokio::test]
async fn nft_receives_name_and_symbol() {
    let dir = artifacts_dir("constructor-args");
    let events = EventLog::default();
    let deployer = MockDeployer::new(events.clone());

    run(&deployer, &dir, None, &events).await.unwrap();

    assert_eq!(deployer.calldata_for("MyERC20"), Bytes::from(BYTECODE.to_vec()));

    let nft_calldata = deployer.calldata_for("MyERC721");
    assert_eq!(&nft_calldata[..BYTECODE.len()], BYTECODE.as_slice());
    let args = DynSolType::Tuple(vec![DynSolType::String, DynSolType::String])
        .abi_decode_params(&nft_calldata[BYTECODE.len()..])
        .unwrap();
    assert_eq!(
        args,
        DynSolValue::Tuple(vec![
            DynSolValue::String("MyERC721".to_string()),
            DynSolValue::String("MYERC721".to_string()),
        ])
    );
}

#[tokio::test]
async fn reruns_deploy_fresh_contracts() {
    let dir = artifacts_dir("rerun");
    let events = EventLog::default();
    let deployer = MockDeployer::new(events.clone());

    let first = run(&deployer, &dir, None, &events).await.unwrap();
    let second = run(&deployer, &dir, None, &events).await.unwrap();

    let mut addresses: Vec<Address> =
        first.iter().chain(second.iter()).map(DeployedContract::address).collect();
    addresses.sort();
    addresses.dedup();
    assert_eq!(addresses.len(), 4);
}

#[tokio::test]
async fn missing_artifact_deploys_nothing() {
    let dir = artifacts_dir("missing-artifact");
    fs::remove_dir_all(dir.join("contracts/MyERC20.sol")).unwrap();
    let events = EventLog::default();
    let deployer = MockDeployer::new(events.clone());

    let res = run(&deployer, &dir, None, &events).await;

    assert!(matches!(res, Err(ScriptError::ArtifactParsing(_))));
    assert!(events.borrow().is_empty());
}
