//! Lifecycle binding between a host element and a behavior attached to it.

use taskcalc_core::{Dispose, FormError, Scope};

use crate::document::{Document, ElementKey, InputEvent};

/// Callbacks a behavior receives while attached to a host element.
pub trait Hook {
    /// The host element became active.
    fn mounted(&mut self, ctx: &HookContext);
    /// The host's content was refreshed.
    fn updated(&mut self, _ctx: &HookContext) {}
    /// The hook is being detached. Listeners registered through the context
    /// are removed right after this returns.
    fn destroyed(&mut self, _ctx: &HookContext) {}
}

#[derive(Clone)]
pub struct HookContext {
    document: Document,
    host: ElementKey,
    scope: Scope,
}

impl HookContext {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn host(&self) -> ElementKey {
        self.host
    }

    /// Listens for `input` events reaching the host, including those bubbling
    /// up from descendants. The listener lives until the hook is destroyed or
    /// the returned guard is run.
    pub fn on_input(&self, f: impl Fn(&InputEvent) + 'static) -> Result<Dispose, FormError> {
        let id = self.document.add_input_listener(self.host, f)?;
        let document = self.document.clone();
        let host = self.host;
        let remove = Dispose::new(move || {
            document.remove_listener(host, id);
        });
        let on_dispose = remove.clone();
        self.scope.add_disposer(move || on_dispose.run());
        Ok(remove)
    }
}

/// A hook attached to a host element. Dropping it detaches the hook's
/// listeners without calling [`Hook::destroyed`].
pub struct MountedHook<H: Hook> {
    hook: H,
    ctx: HookContext,
}

impl Document {
    /// Attaches `hook` to `host` and runs [`Hook::mounted`].
    pub fn mount_hook<H: Hook>(
        &self,
        host: ElementKey,
        mut hook: H,
    ) -> Result<MountedHook<H>, FormError> {
        if !self.contains(host) {
            return Err(FormError::DetachedElement);
        }
        let ctx = HookContext {
            document: self.clone(),
            host,
            scope: Scope::new(),
        };
        hook.mounted(&ctx);
        Ok(MountedHook { hook, ctx })
    }
}

impl<H: Hook> MountedHook<H> {
    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn host(&self) -> ElementKey {
        self.ctx.host
    }

    /// Signals that the host's content was refreshed.
    pub fn update(&mut self) {
        if !self.ctx.document.contains(self.ctx.host) {
            log::warn!("update on a hook whose host was removed; ignoring");
            return;
        }
        self.hook.updated(&self.ctx);
    }

    pub fn destroy(mut self) {
        self.hook.destroyed(&self.ctx);
        self.ctx.scope.clone().dispose();
    }
}
