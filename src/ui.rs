pub fn render_index(today: &str) -> String {
    INDEX_HTML.replace("{{DATE}}", today)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: flex;
      justify-content: center;
      padding: 48px 16px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px 40px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", Georgia, serif;
      margin: 0;
      font-size: 2.2rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #6f6a65;
    }

    .habit {
      display: grid;
      grid-template-columns: 14px 1fr auto auto;
      align-items: center;
      gap: 14px;
      padding: 14px 18px;
      background: white;
      border-radius: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .swatch {
      width: 14px;
      height: 14px;
      border-radius: 50%;
    }

    .streak {
      font-weight: 600;
      color: var(--accent-2);
    }

    form.new-habit,
    .report {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
    }

    input,
    select {
      font: inherit;
      padding: 10px 14px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    button {
      font: inherit;
      border: none;
      border-radius: 14px;
      padding: 10px 18px;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    button.done {
      background: var(--accent-2);
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Habits</h1>
      <p class="subtitle">Today is <span id="date">{{DATE}}</span>. Missing today keeps your streak until midnight.</p>
    </header>

    <form class="new-habit" id="new-habit">
      <input id="title" placeholder="New habit" required maxlength="200" />
      <select id="frequency">
        <option value="daily">Daily</option>
        <option value="weekly">Weekly</option>
      </select>
      <input id="color" type="color" value="#4f46e5" />
      <button type="submit">Add</button>
    </form>

    <section id="habits"></section>

    <section class="report">
      <button type="button" id="weekly-btn">Refresh weekly report</button>
      <button type="button" id="monthly-btn">Refresh monthly report</button>
      <span id="report"></span>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const habitsEl = document.getElementById('habits');
    const statusEl = document.getElementById('status');
    const reportEl = document.getElementById('report');

    const userId = () => {
      let id = localStorage.getItem('habit-user');
      if (!id) {
        id = prompt('User id') || 'guest';
        localStorage.setItem('habit-user', id);
      }
      return id;
    };

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const api = async (method, path, body) => {
      const res = await fetch(path, {
        method,
        headers: { 'content-type': 'application/json', 'x-user-id': userId() },
        body: body ? JSON.stringify(body) : undefined,
      });
      if (!res.ok) {
        throw new Error(await res.text());
      }
      return res.status === 204 ? null : res.json();
    };

    const render = (habits) => {
      habitsEl.innerHTML = '';
      if (!habits.length) {
        habitsEl.textContent = 'No habits yet.';
        return;
      }
      for (const habit of habits) {
        const row = document.createElement('div');
        row.className = 'habit';

        const swatch = document.createElement('span');
        swatch.className = 'swatch';
        swatch.style.background = habit.color;

        const title = document.createElement('span');
        title.textContent = `${habit.title} (${habit.frequency})`;

        const streak = document.createElement('span');
        streak.className = 'streak';
        streak.textContent = `${habit.streak} day streak, best ${habit.longestStreak}`;

        const toggle = document.createElement('button');
        toggle.type = 'button';
        toggle.className = habit.completedToday ? 'done' : '';
        toggle.textContent = habit.completedToday ? 'Done today' : 'Check in';
        toggle.addEventListener('click', async () => {
          try {
            await api('POST', `/api/habits/${habit.id}/toggle`);
            await load();
          } catch (err) {
            setStatus(err.message, 'error');
          }
        });

        row.append(swatch, title, streak, toggle);
        habitsEl.appendChild(row);
      }
    };

    const load = async () => {
      try {
        render(await api('GET', '/api/habits'));
        setStatus('');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    document.getElementById('new-habit').addEventListener('submit', async (event) => {
      event.preventDefault();
      try {
        await api('POST', '/api/habits', {
          title: document.getElementById('title').value,
          frequency: document.getElementById('frequency').value,
          color: document.getElementById('color').value,
        });
        document.getElementById('title').value = '';
        await load();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    const refreshReport = (kind) => async () => {
      try {
        const report = await api('POST', `/api/reports/${kind}`);
        reportEl.textContent = report
          ? `${kind} from ${report.windowStart}: ${report.completionRate}% (${report.totalCompleted} check-ins)`
          : 'Nothing to report yet.';
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    document.getElementById('weekly-btn').addEventListener('click', refreshReport('weekly'));
    document.getElementById('monthly-btn').addEventListener('click', refreshReport('monthly'));

    load();
  </script>
</body>
</html>
"##;
