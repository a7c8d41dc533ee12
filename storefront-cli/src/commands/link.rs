//! Listing link builder
//!
//! Drives the filter form headlessly: each flag is applied as the matching
//! widget change, and the resulting listing URL is printed.

use anyhow::Result;
use clap::Parser;

use storefront_core::{
    keys, DiscountRange, FilterForm, FilterOptions, Gender, Navigation, QueryParams,
};

/// Arguments for the link command
#[derive(Parser, Debug, Default)]
pub struct LinkArgs {
    /// Listing query string to start from (e.g. "brandId=1&page=3")
    #[arg(long, default_value = "")]
    pub from: String,

    /// Clear every filter before applying the flags below
    #[arg(long)]
    pub clear: bool,

    /// Brand ids to select (repeatable or comma-separated)
    #[arg(long = "brand", value_delimiter = ',')]
    pub brands: Vec<i64>,

    /// Category ids to select (repeatable or comma-separated)
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<i64>,

    /// Maximum price, snapped to the slider (100..=2000, step 50)
    #[arg(long)]
    pub price: Option<f64>,

    /// Gender: men, women, boy, girl, or "" for none
    #[arg(long)]
    pub gender: Option<String>,

    /// Occasions to select (repeatable or comma-separated)
    #[arg(long = "occasion", value_delimiter = ',')]
    pub occasions: Vec<String>,

    /// Discount range "lo-hi", or "none"
    #[arg(long)]
    pub discount: Option<String>,
}

/// Print the listing URL produced by applying `args` to the filter form.
pub async fn run_link(args: LinkArgs) -> Result<()> {
    let form = apply(args).await?;
    tracing::debug!(navigations = form.navigator().len(), "filter form applied");
    println!("{}", form.url());
    Ok(())
}

async fn apply(args: LinkArgs) -> Result<FilterForm<Vec<Navigation>>> {
    let params = QueryParams::parse(&args.from);
    let options = FilterOptions::new(
        id_options(&params, keys::BRAND_ID, &args.brands),
        id_options(&params, keys::CATEGORY_ID, &args.categories),
    );
    let mut form = FilterForm::new(params, options, Vec::new());

    if args.clear {
        form.clear_all();
    }
    if !args.brands.is_empty() {
        form.select_brands(&args.brands);
    }
    if !args.categories.is_empty() {
        form.select_categories(&args.categories);
    }
    if let Some(gender) = &args.gender {
        form.select_gender(Gender::parse_param(gender)?);
    }
    if !args.occasions.is_empty() {
        form.select_occasions(&args.occasions);
    }
    if let Some(discount) = &args.discount {
        let range = match discount.trim() {
            "" | "none" | "None" => None,
            raw => Some(raw.parse::<DiscountRange>()?),
        };
        form.select_discount(range);
    }
    if let Some(price) = args.price {
        form.slide_price(price);
        form.settle().await;
    }

    // Reject a starting query the server would refuse
    form.filter()?;
    Ok(form)
}

/// Options for every id mentioned in the URL or on the command line,
/// labelled by id since the names live in the database.
fn id_options(params: &QueryParams, key: &str, extra: &[i64]) -> Vec<(i64, String)> {
    let mut ids: Vec<i64> = params
        .list(key)
        .iter()
        .filter_map(|raw| raw.parse().ok())
        .collect();
    ids.extend_from_slice(extra);
    ids.sort_unstable();
    ids.dedup();
    ids.into_iter().map(|id| (id, id.to_string())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filter_flags_drop_page() {
        let form = apply(LinkArgs {
            from: "brandId=1&page=3".into(),
            brands: vec![1, 4],
            gender: Some("women".into()),
            discount: Some("6-10".into()),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(
            form.url(),
            "/products?brandId=1&brandId=4&gender=women&discount=6-10"
        );
    }

    #[tokio::test]
    async fn clear_resets_everything() {
        let form = apply(LinkArgs {
            from: "brandId=1&gender=men&occasions=party&sortBy=price-desc".into(),
            clear: true,
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(form.url(), "/products?sortBy=price-desc");
        assert_eq!(form.navigator().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn price_waits_for_slider_debounce() {
        let form = apply(LinkArgs {
            from: "pageSize=20".into(),
            price: Some(830.0),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(form.url(), "/products?priceRangeTo=850");
        let last = form.navigator().last().unwrap();
        assert!(!last.scroll);
    }

    #[tokio::test]
    async fn bad_discount_is_rejected() {
        let result = apply(LinkArgs {
            discount: Some("10-6".into()),
            ..Default::default()
        })
        .await;
        assert!(result.is_err());
    }
}
