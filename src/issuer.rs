// Boundary to the wallet: who is connected, and who submits the mint call.
// Signing and submission live behind `TransactionIssuer`; this crate only
// builds the call and reports what came back.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use smol::channel::{Receiver, Sender};

use crate::config::{MintConfig, PayloadMode};
use crate::error::IssueError;
use crate::state::Selection;

/// Supplies the connected wallet address, if any
pub trait AccountProvider {
    fn address(&self) -> Option<String>;
}

/// An account fixed at startup (from config), or none
#[derive(Clone, Debug, Default)]
pub struct StaticAccount(pub Option<String>);

impl AccountProvider for StaticAccount {
    fn address(&self) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalldataArg {
    Felt(String),
    Int(u64),
    List(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractCall {
    pub contract_address: String,
    pub entrypoint: String,
    pub calldata: Vec<CalldataArg>,
}

impl ContractCall {
    /// Build the mint call for `account`.
    ///
    /// In [`PayloadMode::Fixed`] the region is always the 2x2 block at (1, 1)
    /// regardless of what was dragged. [`PayloadMode::Selection`] encodes the
    /// real rectangle as left column, top row, width, height.
    pub fn mint(config: &MintConfig, account: &str, selection: &Selection) -> Self {
        let (x, y, width, height) = match config.payload {
            PayloadMode::Fixed => (1, 1, 2, 2),
            PayloadMode::Selection => {
                let top_left = selection.top_left();
                (
                    top_left.col as u64,
                    top_left.row as u64,
                    selection.width() as u64,
                    selection.height() as u64,
                )
            }
        };

        Self {
            contract_address: config.contract_address.clone(),
            entrypoint: config.entrypoint.clone(),
            calldata: vec![
                CalldataArg::Felt(account.to_string()),
                CalldataArg::Int(x),
                CalldataArg::Int(y),
                CalldataArg::Int(width),
                CalldataArg::Int(height),
                CalldataArg::List(vec![config.image_uri.clone()]),
                CalldataArg::List(vec![config.metadata_uri.clone()]),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxHash(pub String);

/// Submits a contract call. Implementations may block; they are run off the UI thread.
pub trait TransactionIssuer: Send + Sync {
    fn issue(&self, call: &ContractCall) -> Result<TxHash, IssueError>;
}

/// Logs the call instead of submitting it
#[derive(Clone, Copy, Debug, Default)]
pub struct DryRunIssuer;

impl TransactionIssuer for DryRunIssuer {
    fn issue(&self, call: &ContractCall) -> Result<TxHash, IssueError> {
        let payload = serde_json::to_string(call)
            .map_err(|e| IssueError::Rejected(e.to_string()))?;
        info!("dry run: {}", payload);

        let mut hasher = DefaultHasher::new();
        call.hash(&mut hasher);
        Ok(TxHash(format!("0x{:016x}", hasher.finish())))
    }
}

#[derive(Clone, Debug)]
pub struct IssueOutcome {
    pub call: ContractCall,
    pub result: Result<TxHash, IssueError>,
}

/// Runs the issuer in the background and publishes each outcome on a channel.
///
/// Dispatch never waits: the caller resets its own state right away and
/// learns how the call went, if it cares, from the receiver.
#[derive(Clone)]
pub struct IssueDispatcher {
    issuer: Arc<dyn TransactionIssuer>,
    outcomes: Sender<IssueOutcome>,
}

impl IssueDispatcher {
    pub fn new(issuer: Arc<dyn TransactionIssuer>) -> (Self, Receiver<IssueOutcome>) {
        let (outcomes, receiver) = smol::channel::unbounded();
        (Self { issuer, outcomes }, receiver)
    }

    pub fn dispatch(&self, call: ContractCall) {
        let issuer = self.issuer.clone();
        let outcomes = self.outcomes.clone();

        smol::spawn(async move {
            let request = call.clone();
            let result = smol::unblock(move || issuer.issue(&request)).await;
            match &result {
                Ok(hash) => info!("mint submitted: {}", hash.0),
                Err(e) => warn!("mint failed: {}", e),
            }
            if outcomes.send(IssueOutcome { call, result }).await.is_err() {
                debug!("issue outcome dropped, no listener");
            }
        })
        .detach();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::state::CellPosition;

    /// Records every call and answers with a canned result
    #[derive(Default)]
    pub(crate) struct RecordingIssuer {
        pub calls: Mutex<Vec<ContractCall>>,
        pub reject: bool,
    }

    impl TransactionIssuer for RecordingIssuer {
        fn issue(&self, call: &ContractCall) -> Result<TxHash, IssueError> {
            self.calls.lock().unwrap().push(call.clone());
            if self.reject {
                Err(IssueError::Rejected("user declined".into()))
            } else {
                Ok(TxHash("0xabc".into()))
            }
        }
    }

    fn selection() -> Selection {
        Selection::between(CellPosition::new(2, 2), CellPosition::new(4, 5))
    }

    #[test]
    fn fixed_payload_ignores_selection() {
        let config = MintConfig::default();
        let call = ContractCall::mint(&config, "0x01", &selection());

        assert_eq!(call.entrypoint, "mint2");
        assert_eq!(
            call.calldata,
            vec![
                CalldataArg::Felt("0x01".into()),
                CalldataArg::Int(1),
                CalldataArg::Int(1),
                CalldataArg::Int(2),
                CalldataArg::Int(2),
                CalldataArg::List(vec!["http://sitio.com/a.jpg".into()]),
                CalldataArg::List(vec!["http://sitio.com/".into()]),
            ]
        );
    }

    #[test]
    fn selection_payload_encodes_rectangle() {
        let config = MintConfig {
            payload: PayloadMode::Selection,
            ..MintConfig::default()
        };
        let call = ContractCall::mint(&config, "0x01", &selection());

        assert_eq!(&call.calldata[1..5], &[
            CalldataArg::Int(2),
            CalldataArg::Int(2),
            CalldataArg::Int(4),
            CalldataArg::Int(3),
        ]);
    }

    #[test]
    fn calldata_serialises_flat() {
        let call = ContractCall::mint(&MintConfig::default(), "0x01", &selection());
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(
            json["calldata"],
            serde_json::json!(["0x01", 1, 1, 2, 2, ["http://sitio.com/a.jpg"], ["http://sitio.com/"]])
        );
    }

    #[test]
    fn dry_run_hash_is_stable() {
        let call = ContractCall::mint(&MintConfig::default(), "0x01", &selection());
        let a = DryRunIssuer.issue(&call).unwrap();
        let b = DryRunIssuer.issue(&call).unwrap();
        assert_eq!(a, b);
        assert!(a.0.starts_with("0x"));
    }

    #[test]
    fn dispatcher_reports_success_and_failure() {
        let issuer = Arc::new(RecordingIssuer::default());
        let (dispatcher, outcomes) = IssueDispatcher::new(issuer.clone());
        let call = ContractCall::mint(&MintConfig::default(), "0x01", &selection());

        dispatcher.dispatch(call.clone());
        let outcome = smol::block_on(outcomes.recv()).unwrap();
        assert_eq!(outcome.call, call);
        assert_eq!(outcome.result, Ok(TxHash("0xabc".into())));
        assert_eq!(issuer.calls.lock().unwrap().len(), 1);

        let rejecting = Arc::new(RecordingIssuer {
            reject: true,
            ..Default::default()
        });
        let (dispatcher, outcomes) = IssueDispatcher::new(rejecting);
        dispatcher.dispatch(call);
        let outcome = smol::block_on(outcomes.recv()).unwrap();
        assert!(matches!(outcome.result, Err(IssueError::Rejected(_))));
    }
}
