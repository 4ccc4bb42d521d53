use driftfield_platform::{ElementHandle, Extent, RenderSurface};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::ball::{Ball, BallId, BallInstance};
use crate::config::BackgroundOptions;
use crate::error::{Error, Result};
use crate::schedule::FrameLoop;

/// A ball the destination surface refused, handed back so it is not lost.
#[derive(Debug, thiserror::Error)]
#[error("could not attach ball {:?}: {source}", .ball.id())]
pub struct Rejected {
    pub ball: Ball,
    #[source]
    pub source: Error,
}

#[derive(Debug)]
struct Member {
    ball: Ball,
    element: ElementHandle,
}

/// The balls living in one rendering container, with their frame loop.
pub struct BallGroup<S: RenderSurface> {
    surface: S,
    members: Vec<Member>,
    options: BackgroundOptions,
    frame_loop: FrameLoop,
    rng: StdRng,
}

impl<S: RenderSurface> BallGroup<S> {
    /// Populate `surface` with `options.num_balls` balls and start the frame loop.
    ///
    /// A surface with no usable area yields an empty group rather than an error.
    pub fn new(surface: S, options: BackgroundOptions) -> Result<Self> {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(surface, options, rng)
    }

    pub fn with_rng(surface: S, options: BackgroundOptions, rng: StdRng) -> Result<Self> {
        options.validate()?;
        let mut group = Self {
            surface,
            members: Vec::new(),
            options,
            frame_loop: FrameLoop::new(),
            rng,
        };
        group.populate()?;
        group.start();
        Ok(group)
    }

    fn populate(&mut self) -> Result<()> {
        let extent = self.surface.extent();
        if extent.is_degenerate() {
            warn!(
                "container {}x{} has no usable area; group stays empty",
                extent.width, extent.height
            );
            return Ok(());
        }

        for _ in 0..self.options.num_balls {
            let ball = Ball::new(extent.width, extent.height, &self.options.ball, &mut self.rng)?;
            self.attach(ball).map_err(|rejected| rejected.source)?;
        }
        info!(
            "ball group ready: {} balls in {}x{}",
            self.members.len(),
            extent.width,
            extent.height
        );
        Ok(())
    }

    fn attach(&mut self, mut ball: Ball) -> std::result::Result<(), Rejected> {
        let element = match self.surface.attach(&ball.style()) {
            Ok(element) => element,
            Err(err) => {
                return Err(Rejected {
                    ball,
                    source: Error::surface(err),
                })
            }
        };
        if let Some(rendered) = self.surface.measure(element) {
            ball.set_rendered_extent(rendered);
        }
        let position = ball.position();
        if let Err(err) = self.surface.translate(element, position.x, position.y) {
            warn!("initial placement of {:?} failed: {err}", ball.id());
        }
        self.members.push(Member { ball, element });
        Ok(())
    }

    /// Advance every ball one step and push the new positions to the surface.
    /// Does nothing while the loop is stopped; missed frames are not caught up.
    ///
    /// Every ball moves even when the surface rejects some translations; the
    /// first failure is returned after the whole frame has been applied.
    pub fn frame(&mut self) -> Result<()> {
        if !self.frame_loop.begin_frame() {
            return Ok(());
        }
        let mut first_error = None;
        for member in &mut self.members {
            member.ball.advance();
            let position = member.ball.position();
            if let Err(err) = self.surface.translate(member.element, position.x, position.y) {
                warn!("moving {:?} failed: {err}", member.ball.id());
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(Error::surface(err)),
            None => Ok(()),
        }
    }

    pub fn start(&mut self) {
        if !self.frame_loop.is_running() {
            debug!("frame loop started");
        }
        self.frame_loop.start();
    }

    pub fn stop(&mut self) {
        if self.frame_loop.is_running() {
            debug!("frame loop stopped after {} frames", self.frame_loop.frames());
        }
        self.frame_loop.stop();
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn frames(&self) -> u64 {
        self.frame_loop.frames()
    }

    /// Stop updating; balls stay where they are.
    pub fn dispose(&mut self) {
        self.stop();
    }

    /// Detach and hand back a ball. Unknown ids are ignored.
    pub fn remove_ball(&mut self, id: BallId) -> Option<Ball> {
        let (ball, element) = self.take_member(id)?;
        self.release_element(element);
        Some(ball)
    }

    /// Take ownership of a ball coming from another group, state unchanged.
    pub fn add_ball(&mut self, ball: Ball) -> std::result::Result<(), Rejected> {
        self.attach(ball)
    }

    /// Take a ball out of the group while its element stays on the surface.
    /// Pair with [`Self::restore_member`] or [`Self::release_element`].
    pub(crate) fn take_member(&mut self, id: BallId) -> Option<(Ball, ElementHandle)> {
        let index = self.members.iter().position(|m| m.ball.id() == id)?;
        let member = self.members.swap_remove(index);
        Some((member.ball, member.element))
    }

    /// Put back a ball taken with [`Self::take_member`]; its element is still attached.
    pub(crate) fn restore_member(&mut self, ball: Ball, element: ElementHandle) {
        self.members.push(Member { ball, element });
    }

    pub(crate) fn release_element(&mut self, element: ElementHandle) {
        if let Err(err) = self.surface.detach(element) {
            warn!("detaching {:?} failed: {err}", element);
        }
    }

    /// Drop every ball and rebuild as if newly constructed, frame loop included.
    pub fn reset(&mut self) -> Result<()> {
        self.surface.clear().map_err(Error::surface)?;
        self.members.clear();
        self.populate()?;
        self.start();
        info!("ball group reset: {} balls", self.members.len());
        Ok(())
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.surface.set_visible(visible).map_err(Error::surface)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        self.members.iter().map(|m| &m.ball)
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls().find(|b| b.id() == id)
    }

    pub fn ball_ids(&self) -> Vec<BallId> {
        self.balls().map(Ball::id).collect()
    }

    pub(crate) fn ball_id_at(&self, index: usize) -> Option<BallId> {
        self.members.get(index).map(|m| m.ball.id())
    }

    /// Element currently showing a ball on this group's surface.
    pub fn element_of(&self, id: BallId) -> Option<ElementHandle> {
        self.members
            .iter()
            .find(|m| m.ball.id() == id)
            .map(|m| m.element)
    }

    pub fn instances(&self) -> Vec<BallInstance> {
        self.balls().map(Ball::instance).collect()
    }

    pub fn extent(&self) -> Extent {
        self.surface.extent()
    }

    pub fn options(&self) -> &BackgroundOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: RenderSurface + std::fmt::Debug> std::fmt::Debug for BallGroup<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BallGroup")
            .field("surface", &self.surface)
            .field("balls", &self.members.len())
            .field("running", &self.frame_loop.is_running())
            .finish()
    }
}
