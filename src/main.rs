use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eng2d::logging::{init_logging, LoggingConfig};
use eng2d::prelude::*;
use eng2d::triangle::ReadTokens;

const ASSETS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

/// Tank and bullet stay inside this box, in normalized device coordinates.
const FIELD_LIMIT: f32 = 0.9;
const TURN_STEP: f32 = 9.0;
const FORWARD_STEP: f32 = 0.015;
const BACKWARD_STEP: f32 = 0.010;
const BULLET_STEP: f32 = 0.025;
const TANK_SCALE: f32 = 0.25;
const BULLET_SCALE: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Morph,
    Colored,
    Textured,
}

impl Mode {
    fn next(self) -> Self {
        match self {
            Mode::Morph => Mode::Colored,
            Mode::Colored => Mode::Textured,
            Mode::Textured => Mode::Morph,
        }
    }
}

/// Unit vector for a heading in degrees, clockwise from straight up.
fn heading(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.sin(), radians.cos())
}

fn in_field(pos: Vec2, limit: f32) -> bool {
    pos.x.abs() <= limit && pos.y.abs() <= limit
}

#[derive(Debug, Default)]
struct Tank {
    angle: f32,
    pos: Vec2,
}

impl Tank {
    fn turn(&mut self, degrees: f32) {
        self.angle += degrees;
        // keep the angle within (-360, 360)
        if self.angle >= 360.0 {
            self.angle -= 360.0;
        } else if self.angle <= -360.0 {
            self.angle += 360.0;
        }
    }

    /// Moves along the heading unless that would leave the field.
    fn drive(&mut self, distance: f32) {
        let next = self.pos + heading(self.angle) * distance;
        if in_field(next, FIELD_LIMIT) {
            self.pos = next;
        }
    }

    fn matrix(&self, aspect: Mat2x3) -> Mat2x3 {
        aspect
            * Mat2x3::rotate(self.angle)
            * Mat2x3::scale(TANK_SCALE)
            * Mat2x3::translation(self.pos)
    }
}

#[derive(Debug)]
struct Bullet {
    angle: f32,
    pos: Vec2,
}

impl Bullet {
    fn matrix(&self, aspect: Mat2x3) -> Mat2x3 {
        aspect
            * Mat2x3::rotate(self.angle)
            * Mat2x3::scale(BULLET_SCALE)
            * Mat2x3::translation(self.pos)
    }

    /// Advances one step; false once it has left the screen.
    fn advance(&mut self) -> bool {
        self.pos = self.pos + heading(self.angle) * BULLET_STEP;
        self.pos.x.abs() < 1.0 && self.pos.y.abs() < 1.0
    }
}

#[derive(Debug)]
struct Game {
    mode: Mode,
    tank: Tank,
    bullet: Option<Bullet>,
}

impl Game {
    fn new() -> Self {
        Self {
            mode: Mode::Morph,
            tank: Tank::default(),
            bullet: None,
        }
    }

    /// Applies one input event; false when the game should stop.
    fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::TurnOff => return false,
            Event::Button1Released => self.mode = self.mode.next(),
            Event::LeftPressed => self.tank.turn(-TURN_STEP),
            Event::RightPressed => self.tank.turn(TURN_STEP),
            Event::UpPressed => self.tank.drive(FORWARD_STEP),
            Event::DownPressed => self.tank.drive(-BACKWARD_STEP),
            Event::Button2Pressed => {
                if self.bullet.is_none() {
                    self.bullet = Some(Bullet {
                        angle: self.tank.angle,
                        pos: self.tank.pos,
                    });
                }
            }
            _ => {}
        }
        true
    }
}

struct Scenes {
    morph_from: Vec<Tri0>,
    morph_to: Vec<Tri0>,
    colored: Vec<Tri1>,
    sprite: Vec<Tri2>,
}

fn asset(name: &str) -> PathBuf {
    Path::new(ASSETS_DIR).join(name)
}

fn load_scene<T: ReadTokens>(name: &str) -> Result<Vec<T>> {
    let path = asset(name);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    eng2d::parse_triangles(&text).with_context(|| format!("failed to parse {}", path.display()))
}

impl Scenes {
    fn load() -> Result<Self> {
        let mut flat: Vec<Tri0> = load_scene("vert_pos.txt")?;
        anyhow::ensure!(
            flat.len() % 2 == 0,
            "vert_pos.txt needs pairs of start and end triangles"
        );
        let morph_to = flat.split_off(flat.len() / 2);
        Ok(Self {
            morph_from: flat,
            morph_to,
            colored: load_scene("vert_pos_color.txt")?,
            sprite: load_scene("vert_tex_color.txt")?,
        })
    }
}

const MORPH_COLORS: [Color; 2] = [Color::RED, Color::GREEN];

fn render(
    engine: &Engine,
    game: &Game,
    scenes: &Scenes,
    sprites: &[Texture; 2],
    aspect: Mat2x3,
) -> Result<()> {
    match game.mode {
        Mode::Morph => {
            let t = engine.get_time_from_init().sin();
            for (i, (from, to)) in scenes.morph_from.iter().zip(&scenes.morph_to).enumerate() {
                engine.render_flat(&from.lerp(to, t), MORPH_COLORS[i % MORPH_COLORS.len()])?;
            }
        }
        Mode::Colored => {
            for tri in &scenes.colored {
                engine.render_colored(tri);
            }
        }
        Mode::Textured => {
            let [tank, bullet] = sprites;
            let m = game.tank.matrix(aspect);
            for tri in &scenes.sprite {
                engine.render_textured(tri, tank, &m)?;
            }
            if let Some(b) = &game.bullet {
                let m = b.matrix(aspect);
                for tri in &scenes.sprite {
                    engine.render_textured(tri, bullet, &m)?;
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config: EngineConfig = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ")
        .parse()
        .context("invalid engine options")?;
    let scenes = Scenes::load()?;

    let mut engine = Engine::new(&config)?;
    let tank = engine.create_texture(asset("tank.png"))?;
    let bullet = engine.create_texture(asset("bullet.png"))?;
    let sprites = [tank, bullet];
    let aspect = Mat2x3::scale_xy(config.aspect_ratio(), 1.0);

    let mut game = Game::new();
    'running: loop {
        while let Some(event) = engine.read_input() {
            log::debug!("{event}");
            if !game.handle(event) {
                break 'running;
            }
        }

        render(&engine, &game, &scenes, &sprites, aspect)?;

        if game.mode == Mode::Textured && game.bullet.as_mut().is_some_and(|b| !b.advance()) {
            game.bullet = None;
        }

        engine.swap_buffers();
    }

    for texture in sprites {
        engine.destroy_texture(texture);
    }
    engine.uninitialize();
    Ok(())
}
