use anyhow::{Context, bail};
use rust_decimal::Decimal;
use serde_json::json;
use swap_core::{
    amm::{ConstantProductCalculator, QuoteCalculator, swap_amounts},
    codec::{ValueCodec, router_swap_args},
    types::{PairReserves, TokenInfo, TradeType, deadline_after},
    utils::{config::Config, logger::init},
};
use tracing::{debug, info};

const USAGE: &str = "usage:
  swap-core quote <amount_in> <reserve_in> <reserve_out>
  swap-core amount-in <amount_out> <reserve_in> <reserve_out>
  swap-core pair-quote <amount_in> <token_in> <token0> <token1> <reserves-base64-xdr>
  swap-core swap-amounts <exact-in|exact-out> <input_amount> <output_amount>
  swap-core swap-args <exact-in|exact-out> <input_amount> <output_amount> <token_in> <token_out> <to>
  swap-core decode <base64-xdr>";

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    init(&config.logging.level);
    config.validate()?;
    debug!(?config, "configuration loaded");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    let calculator = ConstantProductCalculator::new(config.quote_config().clone());
    let codec = ValueCodec::new(config.codec_config());

    let output = match (command.as_str(), rest) {
        ("quote", [amount_in, reserve_in, reserve_out]) => {
            let amount_out = calculator.quote(
                parse_decimal(amount_in)?,
                parse_decimal(reserve_in)?,
                parse_decimal(reserve_out)?,
            );
            json!({ "amount_out": amount_out })
        }
        ("amount-in", [amount_out, reserve_in, reserve_out]) => {
            let amount_in = calculator.amount_in_for_output(
                parse_decimal(amount_out)?,
                parse_decimal(reserve_in)?,
                parse_decimal(reserve_out)?,
            )?;
            json!({ "amount_in": amount_in })
        }
        ("pair-quote", [amount_in, token_in, token0, token1, reserves]) => {
            let reserves = PairReserves::from_scval(
                token0.as_str(),
                token1.as_str(),
                &codec.decode(reserves).context("decoding pair reserves")?,
            )?;
            let amount_out = calculator.quote_pair(parse_decimal(amount_in)?, token_in, &reserves)?;
            json!({
                "amount_out": amount_out,
                "spot_price": reserves.spot_price(token_in)?,
                "reserves": reserves,
            })
        }
        ("swap-amounts", [trade_type, input, output]) => {
            let trade_type: TradeType = trade_type.parse()?;
            let amounts = swap_amounts(
                trade_type,
                parse_decimal(input)?,
                parse_decimal(output)?,
                config.swap_config().slippage_tolerance_percent,
            )?;
            json!({
                "method": amounts.router_method.method_name(),
                "amount0": amounts.amount0,
                "amount1": amounts.amount1,
                "deadline": deadline_after(config.swap_config().deadline_secs),
            })
        }
        ("swap-args", [trade_type, input, output, token_in, token_out, to]) => {
            let trade_type: TradeType = trade_type.parse()?;
            let decimals = config.quote_config().decimals;
            let token_in = TokenInfo::new(token_in.as_str(), decimals);
            let token_out = TokenInfo::new(token_out.as_str(), decimals);
            let amounts = swap_amounts(
                trade_type,
                token_in.to_raw(parse_decimal(input)?)?,
                token_out.to_raw(parse_decimal(output)?)?,
                config.swap_config().slippage_tolerance_percent,
            )?;
            let deadline = deadline_after(config.swap_config().deadline_secs);
            let call_args = router_swap_args(
                amounts.amount0,
                amounts.amount1,
                &[token_in.address.as_str(), token_out.address.as_str()],
                to,
                deadline,
            )?
            .iter()
            .map(|arg| codec.encode(arg))
            .collect::<Result<Vec<_>, _>>()?;
            json!({
                "method": amounts.router_method.method_name(),
                "args": call_args,
            })
        }
        ("decode", [encoded]) => serde_json::to_value(codec.decode_native(encoded)?)?,
        _ => bail!(USAGE),
    };

    info!(command = command.as_str(), "done");
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_decimal(raw: &str) -> anyhow::Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("'{}' is not a decimal amount", raw))
}
