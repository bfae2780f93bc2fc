/// Runs `f` inside a validation error scope and returns its value together
/// with the first validation error the device reported, if any.
///
/// wgpu reports validation failures asynchronously; the scope is popped with
/// `pollster` since every caller is already on the render thread.
pub(crate) fn capture_validation<T>(
    device: &wgpu::Device,
    f: impl FnOnce() -> T,
) -> (T, Option<wgpu::Error>) {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    let error = pollster::block_on(scope.pop());
    (value, error)
}
