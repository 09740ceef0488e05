//! Foreground process group handling for commands that prompt on the terminal

#[cfg(unix)]
pub(crate) use unix::{claim_foreground, ForegroundGuard};

#[cfg(not(unix))]
pub(crate) use fallback::ForegroundGuard;

#[cfg(unix)]
mod unix {
    use std::io;

    use tracing::debug;

    /// Returns the terminal to the recorded foreground group when dropped
    pub(crate) struct ForegroundGuard {
        fd: libc::c_int,
        previous: libc::pid_t,
    }

    impl ForegroundGuard {
        /// Record the current foreground group of the terminal on stdin.
        ///
        /// Fails when stdin is not a terminal.
        pub(crate) fn capture() -> io::Result<Self> {
            let fd = libc::STDIN_FILENO;

            // SAFETY: plain syscall on the inherited stdin descriptor
            let previous = unsafe { libc::tcgetpgrp(fd) };
            if previous == -1 {
                return Err(io::Error::last_os_error());
            }

            debug!(pgid = previous, "recorded terminal foreground group");
            Ok(Self { fd, previous })
        }
    }

    impl Drop for ForegroundGuard {
        fn drop(&mut self) {
            // A background group reclaiming the terminal receives SIGTTOU
            // unless it ignores it for the duration of the call.
            // SAFETY: the previous handler is restored immediately after
            unsafe {
                let handler = libc::signal(libc::SIGTTOU, libc::SIG_IGN);
                libc::tcsetpgrp(self.fd, self.previous);
                libc::signal(libc::SIGTTOU, handler);
            }
            debug!(pgid = self.previous, "terminal returned to parent");
        }
    }

    /// Pre-exec hook: move the child into its own process group and make
    /// that group the foreground group of the terminal on stdin.
    ///
    /// Runs between fork and exec, so it only makes async-signal-safe calls.
    pub(crate) fn claim_foreground() -> io::Result<()> {
        // SAFETY: only called in the forked child before exec
        unsafe {
            if libc::setpgid(0, 0) == -1 {
                return Err(io::Error::last_os_error());
            }

            let handler = libc::signal(libc::SIGTTOU, libc::SIG_IGN);
            let failed = libc::tcsetpgrp(libc::STDIN_FILENO, libc::getpgrp()) == -1;
            let err = failed.then(io::Error::last_os_error);
            libc::signal(libc::SIGTTOU, handler);

            match err {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::os::unix::process::CommandExt;
        use std::process::{Command, Stdio};

        #[test]
        fn test_claim_foreground_without_terminal_fails_spawn() {
            let mut cmd = Command::new("/bin/sh");
            cmd.arg("-c")
                .arg("exit 0")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            unsafe {
                cmd.pre_exec(claim_foreground);
            }

            assert!(cmd.spawn().is_err());
        }
    }
}

#[cfg(not(unix))]
mod fallback {
    use std::io;

    pub(crate) struct ForegroundGuard;

    impl ForegroundGuard {
        pub(crate) fn capture() -> io::Result<Self> {
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "terminal process groups are not supported on this platform",
            ))
        }
    }
}
