//! Full-screen capture and timestamped screenshot files.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds the screenshot file name for a capture time: `screenshot_DDMMYYYY_HHMMSS.png`.
pub fn screenshot_filename(at: DateTime<Local>) -> String {
    format!("screenshot_{}.png", at.format("%d%m%Y_%H%M%S"))
}

/// Saves `img` into `dir` under a timestamped name, creating `dir` if needed.
///
/// Returns the path written. Two captures within the same second share a
/// name; the later one replaces the earlier.
#[cfg_attr(not(windows), allow(dead_code))]
pub fn save_screenshot(img: &RgbaImage, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(screenshot_filename(Local::now()));
    img.save(&path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(path)
}

/// Captures the primary monitor and saves it to the screenshots directory.
#[cfg(windows)]
pub fn capture_screen_to_file() -> Result<PathBuf> {
    let img = capture::capture_primary_monitor()?;
    save_screenshot(&img, &crate::paths::get_screenshots_dir())
}

#[cfg(windows)]
mod capture {
    //! Primary monitor capture using the Windows Graphics Capture API.

    use anyhow::{anyhow, Context, Result};
    use image::{ImageBuffer, Rgba, RgbaImage};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use windows::core::Interface;
    use windows::Foundation::TypedEventHandler;
    use windows::Graphics::Capture::{Direct3D11CaptureFramePool, GraphicsCaptureItem};
    use windows::Graphics::DirectX::DirectXPixelFormat;
    use windows::Win32::Foundation::POINT;
    use windows::Win32::Graphics::Direct3D::D3D_DRIVER_TYPE_HARDWARE;
    use windows::Win32::Graphics::Direct3D11::{
        D3D11CreateDevice, ID3D11Device, ID3D11DeviceContext, ID3D11Resource, ID3D11Texture2D,
        D3D11_CPU_ACCESS_READ, D3D11_CREATE_DEVICE_BGRA_SUPPORT, D3D11_MAP_READ,
        D3D11_SDK_VERSION, D3D11_TEXTURE2D_DESC, D3D11_USAGE_STAGING,
    };
    use windows::Win32::Graphics::Gdi::{MonitorFromPoint, HMONITOR, MONITOR_DEFAULTTOPRIMARY};
    use windows::Win32::System::WinRT::Direct3D11::CreateDirect3D11DeviceFromDXGIDevice;
    use windows::Win32::System::WinRT::Graphics::Capture::IGraphicsCaptureItemInterop;

    /// Captures the primary monitor into an RGBA image.
    ///
    /// 1. Creates a D3D11 device
    /// 2. Starts a capture session on the monitor
    /// 3. Copies the first frame into a CPU-readable staging texture
    /// 4. Converts BGRA to RGBA
    pub fn capture_primary_monitor() -> Result<RgbaImage> {
        let monitor = unsafe { MonitorFromPoint(POINT { x: 0, y: 0 }, MONITOR_DEFAULTTOPRIMARY) };

        let (device, context) = create_d3d11_device()?;
        let item = create_capture_item(monitor)?;
        let size = item.Size()?;

        let d3d_device = create_direct3d_device(&device)?;
        let frame_pool = Direct3D11CaptureFramePool::CreateFreeThreaded(
            &d3d_device,
            DirectXPixelFormat::B8G8R8A8UIntNormalized,
            1,
            size,
        )?;
        let session = frame_pool.CreateCaptureSession(&item)?;

        let frame_arrived = Arc::new(AtomicBool::new(false));
        let frame_arrived_clone = frame_arrived.clone();
        frame_pool.FrameArrived(&TypedEventHandler::new(
            move |_pool: &Option<Direct3D11CaptureFramePool>, _| {
                frame_arrived_clone.store(true, Ordering::SeqCst);
                Ok(())
            },
        ))?;

        session.StartCapture()?;

        let start = std::time::Instant::now();
        while !frame_arrived.load(Ordering::SeqCst) {
            if start.elapsed().as_secs() > 5 {
                return Err(anyhow!("Timeout waiting for frame"));
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let frame = frame_pool.TryGetNextFrame()?;
        let surface = frame.Surface()?;
        let access: windows::Win32::System::WinRT::Direct3D11::IDirect3DDxgiInterfaceAccess =
            surface.cast()?;
        let texture: ID3D11Texture2D = unsafe { access.GetInterface()? };

        let mut desc = D3D11_TEXTURE2D_DESC::default();
        unsafe { texture.GetDesc(&mut desc) };

        let staging_desc = D3D11_TEXTURE2D_DESC {
            Width: desc.Width,
            Height: desc.Height,
            MipLevels: 1,
            ArraySize: 1,
            Format: desc.Format,
            SampleDesc: desc.SampleDesc,
            Usage: D3D11_USAGE_STAGING,
            BindFlags: Default::default(),
            CPUAccessFlags: D3D11_CPU_ACCESS_READ.0 as u32,
            MiscFlags: Default::default(),
        };

        let staging_texture = unsafe {
            let mut staging: Option<ID3D11Texture2D> = None;
            device.CreateTexture2D(&staging_desc, None, Some(&mut staging))?;
            staging.ok_or_else(|| anyhow!("Failed to create staging texture"))?
        };

        unsafe {
            context.CopyResource(
                &staging_texture.cast::<ID3D11Resource>()?,
                &texture.cast::<ID3D11Resource>()?,
            );
        }

        let mapped = unsafe {
            let mut mapped = Default::default();
            context.Map(
                &staging_texture.cast::<ID3D11Resource>()?,
                0,
                D3D11_MAP_READ,
                0,
                Some(&mut mapped),
            )?;
            mapped
        };

        let width = desc.Width;
        let height = desc.Height;
        let row_pitch = mapped.RowPitch as usize;
        let src_data = unsafe {
            std::slice::from_raw_parts(mapped.pData as *const u8, row_pitch * height as usize)
        };

        let mut img: RgbaImage = ImageBuffer::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let offset = y as usize * row_pitch + x as usize * 4;
            // BGRA -> RGBA
            *pixel = Rgba([
                src_data[offset + 2],
                src_data[offset + 1],
                src_data[offset],
                src_data[offset + 3],
            ]);
        }

        unsafe {
            context.Unmap(&staging_texture.cast::<ID3D11Resource>()?, 0);
        }

        session.Close()?;
        frame_pool.Close()?;

        Ok(img)
    }

    fn create_d3d11_device() -> Result<(ID3D11Device, ID3D11DeviceContext)> {
        let mut device: Option<ID3D11Device> = None;
        let mut context: Option<ID3D11DeviceContext> = None;

        unsafe {
            D3D11CreateDevice(
                None,
                D3D_DRIVER_TYPE_HARDWARE,
                None,
                D3D11_CREATE_DEVICE_BGRA_SUPPORT,
                None,
                D3D11_SDK_VERSION,
                Some(&mut device),
                None,
                Some(&mut context),
            )?;
        }

        Ok((
            device.ok_or_else(|| anyhow!("Failed to create D3D11 device"))?,
            context.ok_or_else(|| anyhow!("Failed to create D3D11 context"))?,
        ))
    }

    fn create_direct3d_device(
        device: &ID3D11Device,
    ) -> Result<windows::Graphics::DirectX::Direct3D11::IDirect3DDevice> {
        let dxgi_device: windows::Win32::Graphics::Dxgi::IDXGIDevice = device.cast()?;
        let inspectable = unsafe { CreateDirect3D11DeviceFromDXGIDevice(&dxgi_device)? };
        inspectable
            .cast()
            .context("Failed to cast to IDirect3DDevice")
    }

    fn create_capture_item(monitor: HMONITOR) -> Result<GraphicsCaptureItem> {
        let class_name = windows::core::h!("Windows.Graphics.Capture.GraphicsCaptureItem");
        let interop: IGraphicsCaptureItemInterop = unsafe {
            windows::Win32::System::WinRT::RoGetActivationFactory(class_name)
                .context("Failed to get IGraphicsCaptureItemInterop")?
        };
        unsafe {
            interop
                .CreateForMonitor(monitor)
                .context("Failed to create capture item for monitor")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_filename_pattern() {
        let at = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(screenshot_filename(at), "screenshot_07032024_090502.png");
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("Screenshots");
        let img = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));

        let path = save_screenshot(&img, &target).unwrap();

        assert!(target.is_dir());
        assert_eq!(path.parent(), Some(target.as_path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("screenshot_") && name.ends_with(".png"));
        assert_eq!(name.len(), "screenshot_DDMMYYYY_HHMMSS.png".len());

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (4, 3));
        assert_eq!(loaded.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }
}
