//! LINK token funding for the oracle-fee-bearing contract.

use alloy_core::primitives::{Address, U256};
use anyhow::{Context, Result};

use crate::abi::{self, Word};
use crate::error::DeployError;
use crate::rpc::{CallRequest, ChainClient};

/// Transfer `fee` LINK base units from `from` to `recipient`, wait for
/// the transfer to be mined, then re-query and report the recipient's
/// balance.
///
/// A failed transfer aborts the calling mint sequence; there is no retry.
pub async fn fund_with_link<C: ChainClient>(
    chain: &C,
    link_token: Address,
    fee: U256,
    recipient: Address,
    from: Address,
) -> Result<U256> {
    let data = abi::encode_call(
        "transfer(address,uint256)",
        &[Word::Address(recipient), Word::Uint(fee)],
    );
    let tx_hash = chain
        .send_transaction(&CallRequest {
            from,
            to: Some(link_token),
            data,
            gas: None,
        })
        .await
        .context("Failed to send LINK transfer")?;

    let receipt = chain.wait_for_receipt(tx_hash).await?;
    if !receipt.succeeded() {
        return Err(DeployError::Transfer(format!(
            "transfer of {} LINK to {recipient} reverted",
            format_link(fee)
        ))
        .into());
    }

    let balance = link_balance(chain, link_token, recipient).await?;
    tracing::info!(
        recipient = %recipient,
        amount = %format_link(fee),
        balance = %format_link(balance),
        "Contract funded with LINK"
    );
    Ok(balance)
}

/// Query an account's LINK balance.
pub async fn link_balance<C: ChainClient>(
    chain: &C,
    link_token: Address,
    account: Address,
) -> Result<U256> {
    let data = abi::encode_call("balanceOf(address)", &[Word::Address(account)]);
    let output = chain
        .call(link_token, data)
        .await
        .context("Failed to query LINK balance")?;
    abi::decode_uint_return(&output).ok_or_else(|| {
        DeployError::Protocol("balanceOf returned fewer than 32 bytes".to_string()).into()
    })
}

/// Render a base-unit LINK amount as a decimal token amount.
pub fn format_link(amount: U256) -> String {
    let base = U256::from(10u64).pow(U256::from(18u64));
    let whole = amount / base;
    let frac = amount % base;
    if frac.is_zero() {
        return whole.to_string();
    }

    let mut frac = format!("{:0>18}", frac.to_string());
    while frac.ends_with('0') {
        frac.pop();
    }
    format!("{whole}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_link_whole_amounts() {
        assert_eq!(format_link(U256::ZERO), "0");
        assert_eq!(format_link(U256::from(10u64).pow(U256::from(18u64))), "1");
        assert_eq!(
            format_link(U256::from(25u64) * U256::from(10u64).pow(U256::from(18u64))),
            "25"
        );
    }

    #[test]
    fn test_format_link_fractional_amounts() {
        // The oracle fee: 0.1 LINK
        assert_eq!(format_link(U256::from(100_000_000_000_000_000u128)), "0.1");
        assert_eq!(format_link(U256::from(1u64)), "0.000000000000000001");
        assert_eq!(
            format_link(U256::from(1_500_000_000_000_000_000u128)),
            "1.5"
        );
    }
}
