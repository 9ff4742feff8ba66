use crate::errors::AppError;

/// Asset turnover ratio: net revenue divided by the period-average of opening
/// and closing assets, rounded to two decimals. Rounding is half away from
/// zero (`f64::round`). Fails validation when the average is exactly zero,
/// which covers both all-zero inputs and exact-opposite asset figures.
pub fn asset_turnover_ratio(
    net_revenue: i64,
    start_assets: i64,
    end_assets: i64,
) -> Result<f64, AppError> {
    let average = (start_assets as f64 + end_assets as f64) / 2.0;
    if average == 0.0 {
        return Err(AppError::Validation(
            "Rata-rata total aset tidak boleh nol. Periksa kembali input aset awal dan akhir periode."
                .to_string(),
        ));
    }
    Ok(((net_revenue as f64 / average) * 100.0).round() / 100.0)
}
