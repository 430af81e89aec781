use criterion::{Criterion, criterion_group, criterion_main};
use domain::{BonusConfig, Money, Product, Variant, VariantChoice, alert};

fn variant_product(variants: usize) -> Product {
    let colors = ["Red", "Blue", "Green", "Black", "White"];
    let sizes = ["XS", "S", "M", "L", "XL"];
    let mut matrix = Vec::with_capacity(variants);
    for i in 0..variants {
        matrix.push(Variant::new(
            colors[i % colors.len()],
            format!("{}-{}", sizes[i % sizes.len()], i / (colors.len() * sizes.len())),
            50,
        ));
    }
    Product::with_variants("SKU-BENCH", "Benchmark Shirt", matrix)
}

fn bench_variant_deduct(c: &mut Criterion) {
    let product = variant_product(25);
    let choice = VariantChoice::new("red", "m-0");

    c.bench_function("domain/variant_deduct", |b| {
        b.iter(|| {
            let mut p = product.clone();
            p.deduct(Some(&choice), 2).unwrap();
        });
    });
}

fn bench_total_stock(c: &mut Criterion) {
    let product = variant_product(100);

    c.bench_function("domain/total_stock_100_variants", |b| {
        b.iter(|| product.total_stock());
    });
}

fn bench_alert_classification(c: &mut Criterion) {
    c.bench_function("domain/alert_classify", |b| {
        b.iter(|| {
            for old in 0u32..20 {
                for new in 0u32..20 {
                    let _ = alert::classify(old, new, 10);
                }
            }
        });
    });
}

fn bench_bonus_math(c: &mut Criterion) {
    let config = BonusConfig {
        purchase_bonus_rate: 2.5,
        referral_commission_rate: 5.0,
        ..BonusConfig::default()
    };

    c.bench_function("domain/purchase_bonus", |b| {
        b.iter(|| config.purchase_bonus(Money::from_cents(123_456)));
    });
}

criterion_group!(
    benches,
    bench_variant_deduct,
    bench_total_stock,
    bench_alert_classification,
    bench_bonus_math
);
criterion_main!(benches);
