// =============================================================================
// Drip Registry Integration Tests
// =============================================================================
// Tests that run against the real NEAR sandbox with cross-contract calls.
// These tests deploy the drip registry + a mock FT contract.
//
// Run: cargo test -p drip-registry-integration-tests

use anyhow::Result;
use near_workspaces::network::Sandbox;
use near_workspaces::types::{Gas, NearToken};
use near_workspaces::{Account, Contract, Worker};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::utils::{deploy_contract, events_named, setup_sandbox};

const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;
const TOTAL_SUPPLY: u128 = 1_000_000 * ONE_TOKEN;

// =============================================================================
// View Structs (match contract's return types)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackView {
    pub track_id: String,
    pub owner_id: String,
    pub co_beneficiary: Option<String>,
    pub base_amount: String,
    pub owner_share: u8,
    pub co_beneficiary_share: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub version: String,
    pub owner_id: String,
    pub token_id: String,
    pub ft_transfer_gas_tgas: u64,
    pub transfer_in_flight: bool,
}

// =============================================================================
// Test Setup Helpers
// =============================================================================

struct Env {
    owner: Account,
    artist: Account,
    featured: Account,
    ft: Contract,
    registry: Contract,
}

async fn setup_env(worker: &Worker<Sandbox>) -> Result<Env> {
    let owner = worker.dev_create_account().await?;
    let artist = worker.dev_create_account().await?;
    let featured = worker.dev_create_account().await?;

    let ft = deploy_contract(worker, "mock-ft").await?;
    ft.call("new")
        .args_json(json!({
            "owner_id": owner.id(),
            "total_supply": TOTAL_SUPPLY.to_string()
        }))
        .transact()
        .await?
        .into_result()?;

    let registry = deploy_contract(worker, "drip-registry").await?;
    registry
        .call("new")
        .args_json(json!({
            "owner_id": owner.id(),
            "token_id": ft.id()
        }))
        .transact()
        .await?
        .into_result()?;

    Ok(Env {
        owner,
        artist,
        featured,
        ft,
        registry,
    })
}

/// Owner funds the treasury via ft_transfer_call
async fn deposit(env: &Env, amount: u128) -> Result<()> {
    env.owner
        .call(env.ft.id(), "ft_transfer_call")
        .args_json(json!({
            "receiver_id": env.registry.id(),
            "amount": amount.to_string(),
            "msg": json!({ "action": "deposit" }).to_string()
        }))
        .deposit(NearToken::from_yoctonear(1))
        .gas(Gas::from_tgas(100))
        .transact()
        .await?
        .into_result()?;
    Ok(())
}

async fn register_track(
    env: &Env,
    caller: &Account,
    track_id: &str,
    co_beneficiary: Option<&Account>,
    base_amount: u128,
    owner_share: u8,
    co_beneficiary_share: u8,
) -> Result<()> {
    caller
        .call(env.registry.id(), "register_track")
        .args_json(json!({
            "track_id": track_id,
            "co_beneficiary": co_beneficiary.map(|account| account.id()),
            "base_amount": base_amount.to_string(),
            "owner_share": owner_share,
            "co_beneficiary_share": co_beneficiary_share
        }))
        .deposit(NearToken::from_millinear(10))
        .transact()
        .await?
        .into_result()?;
    Ok(())
}

async fn ft_balance(env: &Env, account_id: &str) -> Result<u128> {
    let balance: String = env
        .ft
        .view("ft_balance_of")
        .args_json(json!({ "account_id": account_id }))
        .await?
        .json()?;
    Ok(balance.parse()?)
}

async fn treasury_balance(env: &Env) -> Result<u128> {
    let balance: String = env.registry.view("get_treasury_balance").await?.json()?;
    Ok(balance.parse()?)
}

async fn get_config(env: &Env) -> Result<RegistryConfig> {
    Ok(env.registry.view("get_config").await?.json()?)
}

// =============================================================================
// Tests: Treasury Funding
// =============================================================================

#[tokio::test]
async fn test_owner_deposit_credits_treasury() -> Result<()> {
    let worker = setup_sandbox().await?;
    let env = setup_env(&worker).await?;

    deposit(&env, 1_000 * ONE_TOKEN).await?;

    assert_eq!(treasury_balance(&env).await?, 1_000 * ONE_TOKEN);
    assert_eq!(
        ft_balance(&env, env.registry.id().as_str()).await?,
        1_000 * ONE_TOKEN
    );
    Ok(())
}

#[tokio::test]
async fn test_non_owner_deposit_is_refunded() -> Result<()> {
    let worker = setup_sandbox().await?;
    let env = setup_env(&worker).await?;

    env.ft
        .call("mint")
        .args_json(json!({ "account_id": env.artist.id(), "amount": (50 * ONE_TOKEN).to_string() }))
        .transact()
        .await?
        .into_result()?;

    let outcome = env
        .artist
        .call(env.ft.id(), "ft_transfer_call")
        .args_json(json!({
            "receiver_id": env.registry.id(),
            "amount": (50 * ONE_TOKEN).to_string(),
            "msg": json!({ "action": "deposit" }).to_string()
        }))
        .deposit(NearToken::from_yoctonear(1))
        .gas(Gas::from_tgas(100))
        .transact()
        .await?;
    let used: String = outcome.json()?;
    assert_eq!(used, "0", "Rejected deposit keeps nothing");

    assert_eq!(treasury_balance(&env).await?, 0);
    assert_eq!(ft_balance(&env, env.artist.id().as_str()).await?, 50 * ONE_TOKEN);
    Ok(())
}

// =============================================================================
// Tests: Track Registry
// =============================================================================

#[tokio::test]
async fn test_register_and_view_track() -> Result<()> {
    let worker = setup_sandbox().await?;
    let env = setup_env(&worker).await?;

    register_track(&env, &env.artist, "bafy-cid", Some(&env.featured), 101, 60, 40).await?;

    let track: Option<TrackView> = env
        .registry
        .view("get_track")
        .args_json(json!({ "track_id": "bafy-cid" }))
        .await?
        .json()?;
    let track = track.expect("track should exist");
    assert_eq!(track.owner_id, env.artist.id().to_string());
    assert_eq!(track.co_beneficiary, Some(env.featured.id().to_string()));
    assert_eq!(track.base_amount, "101");

    let missing: Option<TrackView> = env
        .registry
        .view("get_track")
        .args_json(json!({ "track_id": "unknown" }))
        .await?
        .json()?;
    assert!(missing.is_none());

    let duplicate = env
        .featured
        .call(env.registry.id(), "register_track")
        .args_json(json!({
            "track_id": "bafy-cid",
            "co_beneficiary": null,
            "base_amount": "1",
            "owner_share": 100,
            "co_beneficiary_share": 0
        }))
        .deposit(NearToken::from_millinear(10))
        .transact()
        .await?;
    assert!(!duplicate.is_success());
    assert!(format!("{:?}", duplicate.failures()).contains("Track already registered"));
    Ok(())
}

// =============================================================================
// Tests: Disbursement
// =============================================================================

#[tokio::test]
async fn test_drip_pays_both_parties() -> Result<()> {
    let worker = setup_sandbox().await?;
    let env = setup_env(&worker).await?;

    deposit(&env, 1_000).await?;
    register_track(&env, &env.artist, "cid", Some(&env.featured), 101, 60, 40).await?;

    let outcome = env
        .owner
        .call(env.registry.id(), "drip_for_track")
        .args_json(json!({ "track_id": "cid" }))
        .gas(Gas::from_tgas(200))
        .transact()
        .await?;
    assert_eq!(events_named(&outcome.logs(), "dripped").len(), 1);
    let dripped: bool = outcome.json()?;
    assert!(dripped);

    assert_eq!(ft_balance(&env, env.artist.id().as_str()).await?, 60);
    assert_eq!(ft_balance(&env, env.featured.id().as_str()).await?, 40);
    assert_eq!(treasury_balance(&env).await?, 900);
    assert!(!get_config(&env).await?.transfer_in_flight);
    Ok(())
}

#[tokio::test]
async fn test_unauthorized_drip_fails() -> Result<()> {
    let worker = setup_sandbox().await?;
    let env = setup_env(&worker).await?;

    deposit(&env, 1_000).await?;
    register_track(&env, &env.artist, "cid", None, 100, 100, 0).await?;

    let outcome = env
        .artist
        .call(env.registry.id(), "drip_for_track")
        .args_json(json!({ "track_id": "cid" }))
        .gas(Gas::from_tgas(200))
        .transact()
        .await?;
    assert!(!outcome.is_success());
    assert!(format!("{:?}", outcome.failures()).contains("Unauthorized access"));

    env.owner
        .call(env.registry.id(), "set_authorized")
        .args_json(json!({ "account_id": env.featured.id(), "enabled": true }))
        .transact()
        .await?
        .into_result()?;

    let outcome = env
        .featured
        .call(env.registry.id(), "drip_for_track")
        .args_json(json!({ "track_id": "cid" }))
        .gas(Gas::from_tgas(200))
        .transact()
        .await?;
    assert!(outcome.json::<bool>()?);
    assert_eq!(ft_balance(&env, env.artist.id().as_str()).await?, 100);
    Ok(())
}

#[tokio::test]
async fn test_failed_leg_reverts_whole_drip() -> Result<()> {
    let worker = setup_sandbox().await?;
    let env = setup_env(&worker).await?;

    deposit(&env, 1_000).await?;
    register_track(&env, &env.artist, "cid", Some(&env.featured), 100, 50, 50).await?;

    env.ft
        .call("set_rejected_receiver")
        .args_json(json!({ "account_id": env.featured.id() }))
        .transact()
        .await?
        .into_result()?;

    let outcome = env
        .owner
        .call(env.registry.id(), "drip_for_track")
        .args_json(json!({ "track_id": "cid" }))
        .gas(Gas::from_tgas(200))
        .transact()
        .await?;
    assert!(events_named(&outcome.logs(), "dripped").is_empty());
    let dripped: bool = outcome.json()?;
    assert!(!dripped);

    // The owner leg ran first in the same receipt and must be undone with it.
    assert_eq!(ft_balance(&env, env.artist.id().as_str()).await?, 0);
    assert_eq!(ft_balance(&env, env.featured.id().as_str()).await?, 0);
    assert_eq!(ft_balance(&env, env.registry.id().as_str()).await?, 1_000);
    assert_eq!(treasury_balance(&env).await?, 1_000);
    assert!(!get_config(&env).await?.transfer_in_flight);
    Ok(())
}

#[tokio::test]
async fn test_reentrant_drip_is_rejected() -> Result<()> {
    let worker = setup_sandbox().await?;
    let env = setup_env(&worker).await?;

    deposit(&env, 1_000).await?;
    register_track(&env, &env.artist, "cid", None, 100, 100, 0).await?;

    // Authorize the token so only the in-flight guard can stop the nested call.
    env.owner
        .call(env.registry.id(), "set_authorized")
        .args_json(json!({ "account_id": env.ft.id(), "enabled": true }))
        .transact()
        .await?
        .into_result()?;
    env.owner
        .call(env.registry.id(), "set_ft_transfer_gas")
        .args_json(json!({ "gas_tgas": 60 }))
        .transact()
        .await?
        .into_result()?;
    env.ft
        .call("set_reentry_hook")
        .args_json(json!({ "registry_id": env.registry.id(), "track_id": "cid" }))
        .transact()
        .await?
        .into_result()?;

    let outcome = env
        .owner
        .call(env.registry.id(), "drip_for_track")
        .args_json(json!({ "track_id": "cid" }))
        .gas(Gas::from_tgas(250))
        .transact()
        .await?;
    assert!(format!("{:?}", outcome.failures())
        .contains("Reentrant call: a transfer is already in flight"));
    assert!(outcome.json::<bool>()?);

    let reentry: Option<bool> = env.ft.view("get_last_reentry_succeeded").await?.json()?;
    assert_eq!(reentry, Some(false));
    assert_eq!(ft_balance(&env, env.artist.id().as_str()).await?, 100);
    assert_eq!(treasury_balance(&env).await?, 900);
    assert!(!get_config(&env).await?.transfer_in_flight);
    Ok(())
}

#[tokio::test]
async fn test_insufficient_treasury_fails_cleanly() -> Result<()> {
    let worker = setup_sandbox().await?;
    let env = setup_env(&worker).await?;

    deposit(&env, 50).await?;
    register_track(&env, &env.artist, "cid", None, 100, 100, 0).await?;

    let outcome = env
        .owner
        .call(env.registry.id(), "drip_for_track")
        .args_json(json!({ "track_id": "cid" }))
        .gas(Gas::from_tgas(200))
        .transact()
        .await?;
    assert!(!outcome.is_success());
    assert!(format!("{:?}", outcome.failures()).contains("Insufficient treasury balance"));
    assert_eq!(treasury_balance(&env).await?, 50);
    assert_eq!(ft_balance(&env, env.artist.id().as_str()).await?, 0);
    Ok(())
}

// =============================================================================
// Tests: Withdrawal
// =============================================================================

#[tokio::test]
async fn test_owner_withdraw() -> Result<()> {
    let worker = setup_sandbox().await?;
    let env = setup_env(&worker).await?;

    deposit(&env, 1_000).await?;
    let owner_before = ft_balance(&env, env.owner.id().as_str()).await?;

    let outcome = env
        .owner
        .call(env.registry.id(), "withdraw")
        .args_json(json!({ "amount": "400" }))
        .gas(Gas::from_tgas(100))
        .transact()
        .await?;
    assert_eq!(events_named(&outcome.logs(), "token_withdrawn").len(), 1);
    assert!(outcome.json::<bool>()?);
    assert_eq!(treasury_balance(&env).await?, 600);
    assert_eq!(ft_balance(&env, env.owner.id().as_str()).await?, owner_before + 400);

    env.ft
        .call("set_fail_next_transfer")
        .args_json(json!({ "should_fail": true }))
        .transact()
        .await?
        .into_result()?;
    let outcome = env
        .owner
        .call(env.registry.id(), "withdraw")
        .args_json(json!({ "amount": "600" }))
        .gas(Gas::from_tgas(100))
        .transact()
        .await?;
    assert!(!outcome.json::<bool>()?);
    assert_eq!(treasury_balance(&env).await?, 600);
    assert!(!get_config(&env).await?.transfer_in_flight);
    Ok(())
}
