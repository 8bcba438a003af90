use rand::Rng;

/// Scroll speed of the nearest layer in pixels per reference frame
const BASE_SPEED: f32 = 4.0;
const STARS_PER_LAYER: usize = 50;

#[derive(Debug, Clone)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

#[derive(Debug, Clone)]
pub struct StarLayer {
    pub speed: f32,
    pub stars: Vec<Star>,
}

/// Parallax background: distant layers scroll slower and have smaller stars
#[derive(Debug, Clone)]
pub struct Starfield {
    pub layers: Vec<StarLayer>,
    width: f32,
    height: f32,
}

impl Starfield {
    pub fn new(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let layers = [0.2, 0.5, 1.0]
            .into_iter()
            .map(|speed| StarLayer {
                speed,
                stars: (0..STARS_PER_LAYER)
                    .map(|_| Star {
                        x: rng.random_range(0.0..width),
                        y: rng.random_range(0.0..height),
                        size: rng.random_range(0.0..2.0) + speed * 1.5,
                    })
                    .collect(),
            })
            .collect();

        Self {
            layers,
            width,
            height,
        }
    }

    pub fn update(&mut self, frames: f32, difficulty: f32, rng: &mut impl Rng) {
        for layer in &mut self.layers {
            let step = BASE_SPEED * layer.speed * difficulty * frames;
            for star in &mut layer.stars {
                star.y += step;
                if star.y > self.height {
                    star.y = 0.0;
                    star.x = rng.random_range(0.0..self.width);
                }
            }
        }
    }
}
