//! Dual-pool AMM walkthrough.
//!
//! Seeds both directional pools of a USDC/WETH pair through the router,
//! pushes one pool's price away with a large swap, and shows the next swap
//! on the sibling pool rebalancing the two before it settles.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=dualpool_amm=debug cargo run --example dual_pool
//! ```

use dualpool_amm::prelude::*;
use dualpool_amm::router::projected_reserves;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const E18: u128 = 1_000_000_000_000_000_000;

fn print_pair(exchange: &Exchange, usdc: Address, weth: Address) -> Result<()> {
    let (usdc_in, weth_in) = exchange.get_pair(usdc, weth);
    let a = exchange.get_reserves(usdc_in)?;
    let b = exchange.get_reserves(weth_in)?;
    println!("  USDC→WETH pool: {} USDC / {} WETH", a.reserve_in, a.reserve_out);
    println!("  WETH→USDC pool: {} USDC / {} WETH", b.reserve_out, b.reserve_in);
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "dualpool_amm=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Dual-Pool AMM ===\n");

    // ── 1. Deploy and fund ──────────────────────────────────────────────
    let admin = Address::repeat_byte(0xad);
    let lp = Address::repeat_byte(0x11);
    let trader = Address::repeat_byte(0x22);
    let usdc = Address::repeat_byte(0x01);
    let weth = Address::repeat_byte(0x02);

    let config = ExchangeConfig::deployed_by(admin)?;
    let mut exchange = Exchange::new(config)?;
    let router = exchange.config().router();
    println!("Swap fee:      {}", config.swap_fee());
    println!("Trigger rate:  {}", config.default_trigger_rate());

    for account in [lp, trader] {
        exchange.mint_tokens(usdc, account, Amount::new(10_000_000 * E18))?;
        exchange.mint_tokens(weth, account, Amount::new(10_000 * E18))?;
        exchange.approve(usdc, account, router, Amount::MAX);
        exchange.approve(weth, account, router, Amount::MAX);
    }
    exchange.set_fee_to(admin, admin)?;

    // ── 2. Seed both pools, 60% into USDC→WETH ──────────────────────────
    let deposit = AddLiquidity::new(
        usdc,
        weth,
        Amount::new(2_000_000 * E18),
        Amount::new(1_000 * E18),
        60,
        lp,
        u64::MAX,
    );
    let added = exchange.router().add_liquidity(lp, &deposit)?;
    println!("\n--- Add liquidity (ratio 60) ---");
    println!("  Deposited:   {} USDC + {} WETH", added.amount_a, added.amount_b);
    println!("  LP minted:   {} + {}", added.liquidity_aab, added.liquidity_abb);
    print_pair(&exchange, usdc, weth)?;

    // ── 3. Large USDC sale moves one pool only ──────────────────────────
    exchange.advance_time(12);
    let amounts = exchange.router().swap_exact_tokens_for_tokens(
        trader,
        Amount::new(50_000 * E18),
        Amount::ZERO,
        &[usdc, weth],
        trader,
        u64::MAX,
    )?;
    println!("\n--- Swap: sell {} USDC ---", amounts[0]);
    println!("  Received:    {} WETH", amounts[1]);
    print_pair(&exchange, usdc, weth)?;

    // ── 4. Quote on the sibling sees the coming rebalance ───────────────
    let projected = projected_reserves(exchange.registry(), weth, usdc)?;
    println!("\nWETH→USDC reserves after arbitrage: {} WETH / {} USDC", projected.reserve_in, projected.reserve_out);

    // ── 5. Swap on the sibling: arbitrage runs first ────────────────────
    exchange.advance_time(12);
    let mark = exchange.events().len();
    let amounts = exchange.router().swap_exact_tokens_for_tokens(
        trader,
        Amount::new(E18),
        Amount::ZERO,
        &[weth, usdc],
        trader,
        u64::MAX,
    )?;
    println!("\n--- Swap: sell {} WETH ---", amounts[0]);
    println!("  Received:    {} USDC", amounts[1]);
    for entry in exchange.events_since(mark) {
        if let Event::Arbitrage { amount0, amount1, .. } = entry.event {
            println!("  Arbitrage:   {amount0} token0 ⇄ {amount1} token1");
        }
    }
    print_pair(&exchange, usdc, weth)?;

    // ── 6. Oracle ───────────────────────────────────────────────────────
    let (usdc_in, _) = exchange.get_pair(usdc, weth);
    let oracle = exchange.get_oracle_info(usdc_in)?;
    println!("\nUSDC→WETH oracle");
    println!("  price_in_cumulative:  {}", oracle.price_in_cumulative);
    println!("  price_out_cumulative: {}", oracle.price_out_cumulative);

    println!("\n=== Done ===");
    Ok(())
}
