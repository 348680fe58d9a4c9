use rendu::prelude::*;

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

fn build_scene() -> Result<Scene, MeshError> {
    let mut scene = Scene::new();

    // One face color per pair of triangles, in the order the cube lists
    // them: +z, -z, -x, +x, +y, -y.
    let face_colors = [
        colors::RED,
        colors::RED,
        colors::GREEN,
        colors::GREEN,
        colors::BLUE,
        colors::BLUE,
        colors::pack_rgb(255, 255, 0),
        colors::pack_rgb(255, 255, 0),
        colors::pack_rgb(255, 0, 255),
        colors::pack_rgb(255, 0, 255),
        colors::pack_rgb(0, 255, 255),
        colors::pack_rgb(0, 255, 255),
    ];
    scene.add_mesh(Mesh::cube(
        Vec3::new(0.0, 0.0, 5.0),
        2.0,
        MeshColor::PerTriangle(face_colors.to_vec()),
    )?);
    scene.add_mesh(Mesh::cube(
        Vec3::new(3.0, 0.0, 8.0),
        1.5,
        MeshColor::Uniform(colors::WHITE),
    )?);

    // Primitives are only visible in the ray casting pipeline.
    scene.add_primitive(Box::new(Sphere::new(
        Vec3::new(0.0, 0.0, 5.0),
        1.0,
        colors::RED,
    )));
    scene.add_primitive(Box::new(Sphere::new(
        Vec3::new(-2.5, 0.5, 7.0),
        1.5,
        colors::GREEN,
    )));
    scene.add_primitive(Box::new(Plane::new(
        Vec3::new(0.0, -1.5, 0.0),
        Vec3::UP,
        colors::pack_rgb(180, 180, 180),
    )));

    Ok(scene)
}

fn main() -> Result<(), String> {
    env_logger::init();

    let settings = RenderSettings::default();
    let (internal_width, internal_height) = settings.internal_size(WINDOW_WIDTH, WINDOW_HEIGHT);

    let mut window = Window::new(
        "rendu",
        WINDOW_WIDTH,
        WINDOW_HEIGHT,
        internal_width,
        internal_height,
    )?;
    let mut frame = FrameBuffer::new(internal_width, internal_height);

    let mut camera = Camera::new(
        Vec3::ZERO,
        settings.world_up,
        settings.fov_degrees,
        internal_width as f32 / internal_height as f32,
        settings.near,
        settings.far,
    );
    let controller = CameraController::default();

    let scene = build_scene().map_err(|e| e.to_string())?;
    let mut pipelines = PipelineDispatcher::new(&settings);

    log::info!(
        "rendering at {}x{} ({}x{} window, quality {})",
        internal_width,
        internal_height,
        WINDOW_WIDTH,
        WINDOW_HEIGHT,
        settings.quality
    );

    let mut input = InputState::default();
    let mut limiter = FrameLimiter::new(&window);
    let mut delta_time = 0.0f32;

    loop {
        match window.poll_events(&mut input) {
            WindowEvent::Quit => break,
            WindowEvent::Resize(w, h) => {
                let (iw, ih) = settings.internal_size(w, h);
                window.set_internal_size(iw, ih)?;
                frame.resize(iw, ih);
                camera.resize(iw, ih);
                log::info!("resized to {w}x{h}, rendering at {iw}x{ih}");
            }
            WindowEvent::None => {}
        }

        if input.select_raster && pipelines.kind() != PipelineKind::Raster {
            pipelines.set_kind(PipelineKind::Raster);
            log::info!("switched to {} pipeline", pipelines.kind());
        }
        if input.select_raycast && pipelines.kind() != PipelineKind::RayCast {
            pipelines.set_kind(PipelineKind::RayCast);
            log::info!("switched to {} pipeline", pipelines.kind());
        }

        controller.update(&mut camera, &input, delta_time);

        pipelines.render(&camera, &scene, &mut frame);
        window.present(frame.as_bytes())?;

        delta_time = limiter.wait_and_get_delta(&window) as f32 / 1000.0;
    }

    Ok(())
}
