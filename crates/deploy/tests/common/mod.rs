//! A scripted in-memory chain for exercising the deploy flows without a
//! node.
//!
//! The fake mimics just enough node behavior for the scripts: create
//! transactions get a fresh contract address, `startMint` receipts carry
//! the request event at its fixed position, transfers move balances, and
//! `tokenURI` answers for finished tokens only.

use std::cell::RefCell;
use std::collections::HashMap;

use alloy_core::primitives::{Address, B256, Bytes, U64, U256, keccak256};
use rosemint_deploy::{CallRequest, ChainClient, LogEntry, RpcError, TransactionReceipt};

pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn encode_string_return(value: &str) -> Bytes {
    let mut out = Vec::new();
    out.extend_from_slice(&U256::from(32u64).to_be_bytes::<32>());
    out.extend_from_slice(&U256::from(value.len()).to_be_bytes::<32>());
    out.extend_from_slice(value.as_bytes());
    out.resize(out.len().div_ceil(32) * 32, 0);
    Bytes::from(out)
}

#[derive(Default)]
struct State {
    nonce: u64,
    sent: Vec<CallRequest>,
    receipts: HashMap<B256, TransactionReceipt>,
    /// (token contract, holder) -> balance
    balances: HashMap<(Address, Address), U256>,
    next_token_id: u64,
    /// (request id, randomness) pairs delivered through the callback
    fulfilled: Vec<(B256, U256)>,
    finished: Vec<U256>,
}

pub struct FakeChain {
    state: RefCell<State>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State::default()),
        }
    }

    /// Every transaction sent, in order.
    pub fn sent(&self) -> Vec<CallRequest> {
        self.state.borrow().sent.clone()
    }

    pub fn balance(&self, token: Address, holder: Address) -> U256 {
        self.state
            .borrow()
            .balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    pub fn fulfilled(&self) -> Vec<(B256, U256)> {
        self.state.borrow().fulfilled.clone()
    }

    pub fn finished(&self) -> Vec<U256> {
        self.state.borrow().finished.clone()
    }

    fn empty_log() -> LogEntry {
        LogEntry {
            address: Address::ZERO,
            topics: vec![B256::ZERO],
            data: Bytes::new(),
        }
    }
}

impl ChainClient for FakeChain {
    async fn send_transaction(&self, request: &CallRequest) -> Result<B256, RpcError> {
        let mut state = self.state.borrow_mut();
        state.nonce += 1;
        let tx_hash = keccak256(state.nonce.to_be_bytes());

        let mut receipt = TransactionReceipt {
            transaction_hash: tx_hash,
            block_number: Some(U64::from(state.nonce)),
            contract_address: None,
            status: Some(U64::from(1)),
            logs: vec![],
        };

        match request.to {
            None => {
                // Create: a fresh deterministic address per transaction.
                let mut bytes = [0u8; 20];
                bytes[12..].copy_from_slice(&state.nonce.to_be_bytes());
                receipt.contract_address = Some(Address::from(bytes));
            }
            Some(token_contract) => {
                let head: [u8; 4] = request.data[..4].try_into().expect("calldata has a selector");
                if head == selector("startMint()") {
                    let token_id = state.next_token_id;
                    state.next_token_id += 1;
                    let request_id = keccak256([b"request".as_slice(), &token_id.to_be_bytes()].concat());
                    let mut request_log = Self::empty_log();
                    request_log.topics = vec![
                        B256::ZERO,
                        request_id,
                        B256::from(U256::from(token_id)),
                    ];
                    // The request event sits at index 3, after three
                    // unrelated logs.
                    receipt.logs = vec![
                        Self::empty_log(),
                        Self::empty_log(),
                        Self::empty_log(),
                        request_log,
                    ];
                } else if head == selector("transfer(address,uint256)") {
                    let recipient = Address::from_slice(&request.data[16..36]);
                    let amount = U256::from_be_slice(&request.data[36..68]);
                    let balance = state
                        .balances
                        .entry((token_contract, recipient))
                        .or_default();
                    *balance += amount;
                } else if head == selector("callBackWithRandomness(bytes32,uint256,address)") {
                    let request_id = B256::from_slice(&request.data[4..36]);
                    let randomness = U256::from_be_slice(&request.data[36..68]);
                    state.fulfilled.push((request_id, randomness));
                } else if head == selector("finishMint(uint256)") {
                    let token_id = U256::from_be_slice(&request.data[4..36]);
                    state.finished.push(token_id);
                } else if head == selector("mint(string)") {
                    // The plain collection finishes in one step.
                    let token_id = U256::from(state.next_token_id);
                    state.next_token_id += 1;
                    state.finished.push(token_id);
                }
            }
        }

        state.sent.push(request.clone());
        state.receipts.insert(tx_hash, receipt);
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt, RpcError> {
        self.state
            .borrow()
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| RpcError::Node(format!("unknown transaction {tx_hash}")))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError> {
        let state = self.state.borrow();
        let head: [u8; 4] = data[..4].try_into().expect("calldata has a selector");

        if head == selector("balanceOf(address)") {
            let holder = Address::from_slice(&data[16..36]);
            let balance = state
                .balances
                .get(&(to, holder))
                .copied()
                .unwrap_or_default();
            return Ok(Bytes::from(balance.to_be_bytes::<32>().to_vec()));
        }

        if head == selector("tokenURI(uint256)") {
            let token_id = U256::from_be_slice(&data[4..36]);
            if state.finished.contains(&token_id) {
                return Ok(encode_string_return(&format!(
                    "data:application/json;base64,rose-{token_id}"
                )));
            }
            // Unfinished tokens have no URI yet.
            return Ok(Bytes::new());
        }

        Ok(Bytes::new())
    }
}
