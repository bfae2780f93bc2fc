/// One-line adapter summary logged at device bring-up.
///
/// Mirrors the vendor / renderer / version strings a GL driver reports.
pub fn describe_adapter(info: &wgpu::AdapterInfo) -> String {
    let driver = match (info.driver.is_empty(), info.driver_info.is_empty()) {
        (true, true) => "unknown driver".to_string(),
        (false, true) => info.driver.clone(),
        (true, false) => info.driver_info.clone(),
        (false, false) => format!("{} {}", info.driver, info.driver_info),
    };
    format!(
        "{} ({:?}, {:?}, vendor 0x{:04x}, device 0x{:04x}, {})",
        info.name, info.backend, info.device_type, info.vendor, info.device, driver
    )
}

/// Logs the adapter summary and the limits the MRT pipeline depends on.
pub(crate) fn log_adapter(adapter: &wgpu::Adapter) {
    log::info!("adapter: {}", describe_adapter(&adapter.get_info()));

    let limits = adapter.limits();
    log::info!(
        "limits: max_color_attachments={} max_color_attachment_bytes_per_sample={} max_texture_dimension_2d={}",
        limits.max_color_attachments,
        limits.max_color_attachment_bytes_per_sample,
        limits.max_texture_dimension_2d,
    );
    log::debug!("features: {:?}", adapter.features());
}
