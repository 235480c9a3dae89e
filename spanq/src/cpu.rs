//! CPU helpers: the spin hint and thread-to-core pinning.

use crate::error::{Result, SpanqError};

/// Spin-wait hint for tight retry loops.
///
/// Lowers to `pause` on x86-64 and `yield` on aarch64; a no-op on
/// architectures without an equivalent. No OS interaction. Purely a
/// throughput/power hint: omitting it never affects correctness.
#[inline(always)]
pub fn cpu_relax() {
    std::hint::spin_loop();
}

/// Pin the calling thread to `cpu_id`.
///
/// Stress drivers use this for steadier contended numbers. A refusal
/// (cgroup-restricted runners, `cpu_id` outside the affinity mask)
/// surfaces the OS detail in the error and is safe to ignore.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu_id: usize) -> Result<()> {
    // A zeroed mask is an empty cpu set; only `cpu_id` gets flipped on.
    let mut cpu_set = unsafe { std::mem::zeroed::<libc::cpu_set_t>() };
    unsafe { libc::CPU_SET(cpu_id, &mut cpu_set) };

    let rc =
        unsafe { libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &cpu_set) };
    if rc != 0 {
        let os_error = std::io::Error::last_os_error();
        return Err(SpanqError::system_resource(format!(
            "pinning thread to cpu {} failed: {}",
            cpu_id, os_error
        )));
    }
    Ok(())
}

/// Pin the calling thread to `cpu_id`.
///
/// macOS only takes affinity hints: threads sharing a tag are scheduled
/// onto the same L2 domain, which is as close to pinning as the kernel
/// allows. Refusals carry the kernel return code.
#[cfg(target_os = "macos")]
pub fn pin_to_cpu(cpu_id: usize) -> Result<()> {
    // Tag 0 is THREAD_AFFINITY_TAG_NULL (no affinity), so tags are
    // offset by one.
    let mut policy = libc::thread_affinity_policy_data_t {
        affinity_tag: cpu_id as i32 + 1,
    };

    let kr = unsafe {
        libc::thread_policy_set(
            libc::pthread_self() as libc::mach_port_t,
            libc::THREAD_AFFINITY_POLICY as u32,
            &mut policy as *mut _ as *mut i32,
            1,
        )
    };
    if kr != 0 {
        return Err(SpanqError::system_resource(format!(
            "affinity tag for cpu {} rejected: kern_return {}",
            cpu_id, kr
        )));
    }
    Ok(())
}

/// Pinning is not supported on this platform; the request is a no-op.
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub fn pin_to_cpu(_cpu_id: usize) -> Result<()> {
    Ok(())
}
